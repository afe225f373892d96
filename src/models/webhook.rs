//! Outreach webhook requests.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CAMPAIGN_NAME: &str = "Link Building Outreach";

/// Hand-picked outreach target outside the competitor list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTarget {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerOutreachRequest {
    pub webhook_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_targets: Option<Vec<CustomTarget>>,
    pub campaign_name: String,
    pub include_backlink_data: bool,
}

impl TriggerOutreachRequest {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            competitor_ids: None,
            custom_targets: None,
            campaign_name: DEFAULT_CAMPAIGN_NAME.to_string(),
            include_backlink_data: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutreachResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub targets_sent: usize,
    #[serde(default)]
    pub webhook_status: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_defaults() {
        let req = TriggerOutreachRequest::new("https://hooks.example.com/n8n");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["campaign_name"], DEFAULT_CAMPAIGN_NAME);
        assert_eq!(body["include_backlink_data"], true);
        assert!(body.get("competitor_ids").is_none());
    }
}
