//! Rank tracking records: tracked keywords, history, SERP snapshots, stats.

use serde::{Deserialize, Serialize};

/// Default DataForSEO location (United States).
pub const DEFAULT_LOCATION_CODE: u32 = 2840;
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Latest rank check for a tracked keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedKeyword {
    #[serde(default)]
    pub id: Option<String>,
    pub keyword_id: String,
    #[serde(default)]
    pub keyword_text: String,
    pub tracked_url: String,
    #[serde(default, alias = "position")]
    pub rank_position: Option<u32>,
    #[serde(default = "default_search_engine")]
    pub search_engine: String,
    #[serde(default = "default_location_code")]
    pub location_code: u32,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    pub checked_at: String,
}

fn default_search_engine() -> String {
    "google".to_string()
}

fn default_location_code() -> u32 {
    DEFAULT_LOCATION_CODE
}

fn default_language_code() -> String {
    DEFAULT_LANGUAGE_CODE.to_string()
}

/// Request body for `POST /rank-tracking`.
#[derive(Debug, Clone, Serialize)]
pub struct EnableTrackingRequest {
    pub keyword_id: String,
    pub tracked_url: String,
    pub location_code: u32,
    pub language_code: String,
}

impl EnableTrackingRequest {
    /// Track `tracked_url` for a keyword with the default location and language.
    pub fn new(keyword_id: impl Into<String>, tracked_url: impl Into<String>) -> Self {
        Self {
            keyword_id: keyword_id.into(),
            tracked_url: tracked_url.into(),
            location_code: DEFAULT_LOCATION_CODE,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    #[serde(default)]
    pub position: Option<u32>,
}

/// Daily average positions for one keyword.
#[derive(Debug, Clone, Deserialize)]
pub struct RankHistory {
    pub keyword_id: String,
    #[serde(default)]
    pub keyword_text: String,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerpResult {
    #[serde(default)]
    pub position: Option<u32>,
    pub url: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Most recent search results page captured for a keyword.
#[derive(Debug, Clone, Deserialize)]
pub struct SerpSnapshot {
    pub keyword_id: String,
    #[serde(default)]
    pub keyword_text: String,
    #[serde(default)]
    pub snapshot_date: Option<String>,
    #[serde(default)]
    pub results: Vec<SerpResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckNowResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub keyword_text: String,
    #[serde(default)]
    pub rank_position: Option<u32>,
    #[serde(default)]
    pub checked_at: Option<String>,
}

/// Rank overview for a project. The `top_*` counts are cumulative
/// (every keyword in the top 3 is also counted in the top 10).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RankStatsWire")]
pub struct RankStats {
    pub total_keywords: u32,
    pub average_position: Option<f64>,
    pub top_3: u32,
    pub top_10: u32,
    pub top_20: u32,
    pub top_50: u32,
    pub not_ranking: u32,
}

/// The overview endpoint answers either flat, or with a nested
/// `distribution` that stops at 20. In the nested form nothing separates
/// 21-50 from the rest, so those keywords land in `not_ranking`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RankStatsWire {
    Nested {
        #[serde(alias = "total_keywords")]
        total_tracked: u32,
        #[serde(default)]
        average_position: Option<f64>,
        distribution: Distribution,
    },
    Flat {
        #[serde(alias = "total_tracked")]
        total_keywords: u32,
        #[serde(default)]
        average_position: Option<f64>,
        #[serde(default)]
        top_3: u32,
        #[serde(default)]
        top_10: u32,
        #[serde(default)]
        top_20: u32,
        #[serde(default)]
        top_50: u32,
        #[serde(default)]
        not_ranking: u32,
    },
}

#[derive(Deserialize)]
struct Distribution {
    #[serde(default)]
    top_3: u32,
    #[serde(default)]
    top_10: u32,
    #[serde(default)]
    top_20: u32,
    #[serde(default)]
    below_20: u32,
}

impl From<RankStatsWire> for RankStats {
    fn from(wire: RankStatsWire) -> Self {
        match wire {
            RankStatsWire::Nested {
                total_tracked,
                average_position,
                distribution,
            } => RankStats {
                total_keywords: total_tracked,
                average_position,
                top_3: distribution.top_3,
                top_10: distribution.top_10,
                top_20: distribution.top_20,
                top_50: distribution.top_20,
                not_ranking: distribution.below_20,
            },
            RankStatsWire::Flat {
                total_keywords,
                average_position,
                top_3,
                top_10,
                top_20,
                top_50,
                not_ranking,
            } => RankStats {
                total_keywords,
                average_position,
                top_3,
                top_10,
                top_20,
                top_50,
                not_ranking,
            },
        }
    }
}
