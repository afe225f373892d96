//! Keyword endpoints, scoped to a project.

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{
    AddKeywordRequest, BulkAddRequest, BulkAddResult, CostEstimate, Keyword, RefreshAllResult,
};

pub struct KeywordsApi<'a> {
    client: &'a ApiClient,
    base: String,
}

impl ApiClient {
    pub fn keywords(&self, project_id: &str) -> KeywordsApi<'_> {
        KeywordsApi {
            client: self,
            base: format!("/api/projects/{}/keywords", project_id),
        }
    }
}

impl KeywordsApi<'_> {
    /// GET /api/projects/:id/keywords
    pub async fn list(&self) -> Result<Vec<Keyword>, ClientError> {
        self.client.get_json(&self.base).await
    }

    /// GET /api/projects/:id/keywords/:kid
    pub async fn get(&self, keyword_id: &str) -> Result<Keyword, ClientError> {
        self.client
            .get_json(&format!("{}/{}", self.base, keyword_id))
            .await
    }

    /// POST /api/projects/:id/keywords - Add one keyword.
    pub async fn add(&self, keyword_text: &str) -> Result<Keyword, ClientError> {
        let body = AddKeywordRequest {
            keyword_text: keyword_text.to_string(),
        };
        self.client.post_json(&self.base, &body).await
    }

    /// POST /api/projects/:id/keywords/bulk - Add many; duplicates are skipped server-side.
    pub async fn bulk_add(&self, keywords: Vec<String>) -> Result<BulkAddResult, ClientError> {
        let body = BulkAddRequest { keywords };
        self.client
            .post_json(&format!("{}/bulk", self.base), &body)
            .await
    }

    /// PUT /api/projects/:id/keywords/:kid/refresh - Pull fresh metrics for one keyword.
    pub async fn refresh(&self, keyword_id: &str) -> Result<Keyword, ClientError> {
        let builder = self.client.request(
            reqwest::Method::PUT,
            &format!("{}/{}/refresh", self.base, keyword_id),
        );
        self.client.send_json(builder).await
    }

    /// POST /api/projects/:id/keywords/refresh-all
    pub async fn refresh_all(&self) -> Result<RefreshAllResult, ClientError> {
        let builder = self.client.request(
            reqwest::Method::POST,
            &format!("{}/refresh-all", self.base),
        );
        self.client.send_json(builder).await
    }

    /// GET /api/projects/:id/keywords/cost-estimate/refresh
    pub async fn estimate_cost(&self) -> Result<CostEstimate, ClientError> {
        self.client
            .get_json(&format!("{}/cost-estimate/refresh", self.base))
            .await
    }

    /// DELETE /api/projects/:id/keywords/:kid
    pub async fn delete(&self, keyword_id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("{}/{}", self.base, keyword_id))
            .await
    }
}
