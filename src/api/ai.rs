//! AI assistant endpoints.

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{
    AiAnalysis, AnalyzeKeywordsRequest, ChatReply, ChatRequest, KeywordAnalysisRequest,
};

pub struct AiApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn ai(&self) -> AiApi<'_> {
        AiApi { client: self }
    }
}

impl AiApi<'_> {
    /// POST /api/ai/chat
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.client.post_json("/api/ai/chat", request).await
    }

    /// POST /api/ai/analyze/keywords - Opportunity analysis over a project's keywords.
    pub async fn analyze_keywords(&self, project_id: &str) -> Result<AiAnalysis, ClientError> {
        let body = AnalyzeKeywordsRequest {
            project_id: project_id.to_string(),
        };
        self.client.post_json("/api/ai/analyze/keywords", &body).await
    }

    /// POST /api/ai/analyze/serp
    pub async fn analyze_serp(
        &self,
        keyword_id: &str,
        project_id: &str,
    ) -> Result<AiAnalysis, ClientError> {
        let body = KeywordAnalysisRequest {
            keyword_id: keyword_id.to_string(),
            project_id: project_id.to_string(),
        };
        self.client.post_json("/api/ai/analyze/serp", &body).await
    }

    /// POST /api/ai/generate/content-brief
    pub async fn content_brief(
        &self,
        keyword_id: &str,
        project_id: &str,
    ) -> Result<AiAnalysis, ClientError> {
        let body = KeywordAnalysisRequest {
            keyword_id: keyword_id.to_string(),
            project_id: project_id.to_string(),
        };
        self.client
            .post_json("/api/ai/generate/content-brief", &body)
            .await
    }
}
