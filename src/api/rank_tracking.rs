//! Rank tracking endpoints, scoped to a project.

use reqwest::Method;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{
    CheckNowResult, EnableTrackingRequest, RankHistory, RankStats, SerpSnapshot, TrackedKeyword,
};

pub struct RankTrackingApi<'a> {
    client: &'a ApiClient,
    base: String,
}

impl ApiClient {
    pub fn rank_tracking(&self, project_id: &str) -> RankTrackingApi<'_> {
        RankTrackingApi {
            client: self,
            base: format!("/api/projects/{}/rank-tracking", project_id),
        }
    }
}

impl RankTrackingApi<'_> {
    /// GET /api/projects/:id/rank-tracking - Latest check per tracked keyword.
    pub async fn list(&self) -> Result<Vec<TrackedKeyword>, ClientError> {
        self.client.get_json(&self.base).await
    }

    /// POST /api/projects/:id/rank-tracking - Start tracking a keyword.
    pub async fn enable(
        &self,
        request: &EnableTrackingRequest,
    ) -> Result<TrackedKeyword, ClientError> {
        self.client.post_json(&self.base, request).await
    }

    /// GET /api/projects/:id/rank-tracking/:kid/history?days=
    pub async fn history(
        &self,
        keyword_id: &str,
        days: Option<u32>,
    ) -> Result<RankHistory, ClientError> {
        let mut builder = self
            .client
            .request(Method::GET, &format!("{}/{}/history", self.base, keyword_id));
        if let Some(days) = days {
            builder = builder.query(&[("days", days)]);
        }
        self.client.send_json(builder).await
    }

    /// GET /api/projects/:id/rank-tracking/:kid/serp - Latest SERP snapshot.
    pub async fn serp(&self, keyword_id: &str) -> Result<SerpSnapshot, ClientError> {
        self.client
            .get_json(&format!("{}/{}/serp", self.base, keyword_id))
            .await
    }

    /// POST /api/projects/:id/rank-tracking/:kid/check-now
    pub async fn check_now(&self, keyword_id: &str) -> Result<CheckNowResult, ClientError> {
        let builder = self.client.request(
            Method::POST,
            &format!("{}/{}/check-now", self.base, keyword_id),
        );
        self.client.send_json(builder).await
    }

    /// DELETE /api/projects/:id/rank-tracking/:kid - Stop tracking.
    pub async fn stop(&self, keyword_id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("{}/{}", self.base, keyword_id))
            .await
    }

    /// GET /api/projects/:id/rank-tracking/stats/overview
    pub async fn stats(&self) -> Result<RankStats, ClientError> {
        self.client
            .get_json(&format!("{}/stats/overview", self.base))
            .await
    }
}
