//! Competitor endpoints, scoped to a project.

use reqwest::Method;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{
    Competitor, CreateCompetitorRequest, GapReport, OverlapReport, SerpFeaturesReport,
};

pub struct CompetitorsApi<'a> {
    client: &'a ApiClient,
    base: String,
}

impl ApiClient {
    pub fn competitors(&self, project_id: &str) -> CompetitorsApi<'_> {
        CompetitorsApi {
            client: self,
            base: format!("/api/projects/{}/competitors", project_id),
        }
    }
}

impl CompetitorsApi<'_> {
    /// GET /api/projects/:id/competitors
    pub async fn list(&self) -> Result<Vec<Competitor>, ClientError> {
        self.client.get_json(&self.base).await
    }

    /// POST /api/projects/:id/competitors
    pub async fn add(&self, request: &CreateCompetitorRequest) -> Result<Competitor, ClientError> {
        self.client.post_json(&self.base, request).await
    }

    /// DELETE /api/projects/:id/competitors/:cid
    pub async fn delete(&self, competitor_id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("{}/{}", self.base, competitor_id))
            .await
    }

    /// GET /api/projects/:id/competitors/analysis/keyword-overlap
    pub async fn keyword_overlap(&self) -> Result<OverlapReport, ClientError> {
        self.client
            .get_json(&format!("{}/analysis/keyword-overlap", self.base))
            .await
    }

    /// GET /api/projects/:id/competitors/analysis/gap-analysis?competitor_id=
    pub async fn gap_analysis(&self, competitor_id: &str) -> Result<GapReport, ClientError> {
        let builder = self
            .client
            .request(Method::GET, &format!("{}/analysis/gap-analysis", self.base))
            .query(&[("competitor_id", competitor_id)]);
        self.client.send_json(builder).await
    }

    /// GET /api/projects/:id/competitors/analysis/serp-features
    pub async fn serp_features(&self) -> Result<SerpFeaturesReport, ClientError> {
        self.client
            .get_json(&format!("{}/analysis/serp-features", self.base))
            .await
    }
}
