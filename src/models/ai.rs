//! AI assistant requests and replies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A turn as the backend sees it in `conversation_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub conversation_history: Vec<ChatTurn>,
}

/// Reply to `POST /api/ai/chat`. Older deployments put the text in `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
}

impl ChatReply {
    pub fn text(&self) -> Option<&str> {
        self.response
            .as_deref()
            .or(self.message.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeKeywordsRequest {
    pub project_id: String,
}

/// Body shared by SERP analysis and content brief generation.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordAnalysisRequest {
    pub keyword_id: String,
    pub project_id: String,
}

/// Analysis or brief output. `success: false` carries a reason in `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub brief: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AiAnalysis {
    pub fn text(&self) -> Option<&str> {
        self.analysis
            .as_deref()
            .or(self.brief.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
    }
}
