//! Keyword research records.

use serde::{Deserialize, Serialize};

/// A search term tracked for volume, difficulty and CPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub keyword_text: String,
    #[serde(default)]
    pub search_volume: Option<u64>,
    #[serde(default, alias = "difficulty")]
    pub keyword_difficulty: Option<u32>,
    #[serde(default, deserialize_with = "super::optional_decimal")]
    pub cpc: Option<f64>,
    #[serde(default, deserialize_with = "super::optional_decimal")]
    pub competition: Option<f64>,
    #[serde(default)]
    pub last_refreshed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddKeywordRequest {
    pub keyword_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAddRequest {
    pub keywords: Vec<String>,
}

/// Outcome of `POST /keywords/bulk`; duplicates are skipped server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkAddResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub added: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshAllResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub updated: u32,
    #[serde(default, deserialize_with = "super::optional_decimal")]
    pub cost: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Projected spend for refreshing every keyword in a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CostEstimate {
    pub keyword_count: u32,
    #[serde(deserialize_with = "super::decimal")]
    pub estimated_cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}
