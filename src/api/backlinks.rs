//! Backlink endpoints, scoped to a project.

use reqwest::Method;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{BacklinkPage, BacklinkSummary, ReferringDomainPage};

pub struct BacklinksApi<'a> {
    client: &'a ApiClient,
    base: String,
}

impl ApiClient {
    pub fn backlinks(&self, project_id: &str) -> BacklinksApi<'_> {
        BacklinksApi {
            client: self,
            base: format!("/api/projects/{}/backlinks", project_id),
        }
    }
}

impl BacklinksApi<'_> {
    /// GET /api/projects/:id/backlinks/summary
    pub async fn summary(&self) -> Result<BacklinkSummary, ClientError> {
        self.client
            .get_json(&format!("{}/summary", self.base))
            .await
    }

    /// GET /api/projects/:id/backlinks/list?limit=&offset=
    pub async fn list(&self, limit: u32, offset: u32) -> Result<BacklinkPage, ClientError> {
        let builder = self
            .client
            .request(Method::GET, &format!("{}/list", self.base))
            .query(&[("limit", limit), ("offset", offset)]);
        self.client.send_json(builder).await
    }

    /// GET /api/projects/:id/backlinks/referring-domains?limit=
    pub async fn referring_domains(&self, limit: u32) -> Result<ReferringDomainPage, ClientError> {
        let builder = self
            .client
            .request(Method::GET, &format!("{}/referring-domains", self.base))
            .query(&[("limit", limit)]);
        self.client.send_json(builder).await
    }
}
