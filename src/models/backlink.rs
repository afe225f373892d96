//! Backlink profile records for a project's domain.

use serde::{Deserialize, Serialize};

/// Headline backlink numbers. Fields missing from the backend read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklinkSummary {
    #[serde(default)]
    pub total_backlinks: u64,
    #[serde(default)]
    pub referring_domains: u64,
    #[serde(default)]
    pub referring_ips: u64,
    #[serde(default)]
    pub domain_rank: u32,
    #[serde(default)]
    pub new_backlinks_30d: u64,
    #[serde(default)]
    pub lost_backlinks_30d: u64,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backlink {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "domain_from")]
    pub source_domain: String,
    #[serde(alias = "url_from")]
    pub source_url: String,
    #[serde(default, alias = "url_to")]
    pub target_url: Option<String>,
    #[serde(default, alias = "anchor")]
    pub anchor_text: Option<String>,
    #[serde(default, alias = "domain_from_rank")]
    pub domain_rank: Option<u32>,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferringDomain {
    pub domain: String,
    #[serde(default, alias = "backlinks")]
    pub backlinks_count: u64,
    #[serde(default, alias = "rank")]
    pub domain_rank: u32,
    #[serde(default)]
    pub first_seen: Option<String>,
}

/// One page of `GET /backlinks/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct BacklinkPage {
    #[serde(default)]
    pub backlinks: Vec<Backlink>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferringDomainPage {
    #[serde(default)]
    pub domains: Vec<ReferringDomain>,
    #[serde(default)]
    pub count: usize,
}
