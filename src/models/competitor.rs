//! Competitor domains and the analyses computed against them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: String,
    pub domain: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request body for adding a competitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCompetitorRequest {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateCompetitorRequest {
    /// Trims both fields; blank notes are omitted. Returns `None` for a blank domain.
    pub fn new(domain: &str, notes: Option<&str>) -> Option<Self> {
        let domain = domain.trim();
        if domain.is_empty() {
            return None;
        }
        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Some(Self {
            domain: domain.to_string(),
            notes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRanking {
    pub domain: String,
    #[serde(default)]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordOverlap {
    pub keyword: String,
    #[serde(default, alias = "your_position")]
    pub our_position: Option<u32>,
    #[serde(default)]
    pub competitors_ranking: Vec<CompetitorRanking>,
    #[serde(default)]
    pub total_competitors_ranking: usize,
    #[serde(default)]
    pub opportunity_score: Option<f64>,
}

/// `GET /analysis/keyword-overlap`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlapReport {
    #[serde(default)]
    pub total_keywords: usize,
    #[serde(default)]
    pub keywords_analyzed: usize,
    #[serde(default)]
    pub overlap: Vec<KeywordOverlap>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A keyword where a competitor outranks the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapOpportunity {
    pub keyword: String,
    pub competitor_position: u32,
    #[serde(default)]
    pub our_position: Option<u32>,
    #[serde(default)]
    pub opportunity_score: f64,
    #[serde(default)]
    pub gap_size: i64,
}

/// `GET /analysis/gap-analysis?competitor_id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct GapReport {
    pub competitor: String,
    #[serde(default)]
    pub total_gaps: usize,
    #[serde(default)]
    pub opportunities: Vec<GapOpportunity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerpFeatureEntry {
    pub keyword: String,
    #[serde(default)]
    pub features: serde_json::Value,
    #[serde(default)]
    pub snapshot_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SerpFeaturesReport {
    #[serde(default)]
    pub total_keywords: usize,
    #[serde(default)]
    pub keywords_with_features: usize,
    #[serde(default)]
    pub features: Vec<SerpFeatureEntry>,
}

impl SerpFeatureEntry {
    /// Feature names present on the results page, whatever shape the backend stored.
    pub fn feature_names(&self) -> Vec<String> {
        match &self.features {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            serde_json::Value::Object(map) => map
                .iter()
                .filter(|(_, v)| !matches!(v, serde_json::Value::Null | serde_json::Value::Bool(false)))
                .map(|(k, _)| k.clone())
                .collect(),
            serde_json::Value::String(s) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}
