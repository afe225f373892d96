//! Third-party credential endpoints.

use std::collections::BTreeMap;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{CredentialCheck, CredentialInfo, Provider, SetupResult};

pub struct CredentialsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn credentials(&self) -> CredentialsApi<'_> {
        CredentialsApi { client: self }
    }
}

impl CredentialsApi<'_> {
    /// GET /api/credentials/check/:provider - Whether the provider is configured.
    pub async fn check(&self, provider: Provider) -> Result<CredentialCheck, ClientError> {
        self.client
            .get_json(&format!("/api/credentials/check/{}", provider.as_str()))
            .await
    }

    /// POST /api/credentials/setup/:provider - Validate and store provider credentials.
    pub async fn setup(
        &self,
        provider: Provider,
        fields: &BTreeMap<String, String>,
    ) -> Result<SetupResult, ClientError> {
        self.client
            .post_json(
                &format!("/api/credentials/setup/{}", provider.as_str()),
                fields,
            )
            .await
    }

    /// GET /api/credentials/:provider - Credential metadata.
    pub async fn get(&self, provider: Provider) -> Result<CredentialInfo, ClientError> {
        self.client
            .get_json(&format!("/api/credentials/{}", provider.as_str()))
            .await
    }

    /// DELETE /api/credentials/:provider - Deactivate stored credentials.
    pub async fn delete(&self, provider: Provider) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/api/credentials/{}", provider.as_str()))
            .await
    }
}
