//! Outreach webhook endpoints.

use reqwest::Method;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{OutreachResult, TriggerOutreachRequest, WebhookStatus};

pub struct WebhooksApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn webhooks(&self) -> WebhooksApi<'_> {
        WebhooksApi { client: self }
    }
}

impl WebhooksApi<'_> {
    /// POST /api/webhooks/outreach/trigger?project_id= - Hand targets to the outreach workflow.
    pub async fn trigger_outreach(
        &self,
        project_id: &str,
        request: &TriggerOutreachRequest,
    ) -> Result<OutreachResult, ClientError> {
        let builder = self
            .client
            .request(Method::POST, "/api/webhooks/outreach/trigger")
            .query(&[("project_id", project_id)])
            .json(request);
        self.client.send_json(builder).await
    }

    /// GET /api/webhooks/test
    pub async fn test(&self) -> Result<WebhookStatus, ClientError> {
        self.client.get_json("/api/webhooks/test").await
    }
}
