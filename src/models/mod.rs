//! Typed records for every backend response the console consumes.
//!
//! Field names follow the backend's snake_case JSON. Where the backend and
//! the dashboard views historically used different names, serde aliases
//! accept both so decoding fails only on genuinely malformed payloads.

mod ai;
mod backlink;
mod competitor;
mod credential;
mod keyword;
mod project;
mod rank_tracking;
mod user;
mod webhook;

pub use ai::*;
pub use backlink::*;
pub use competitor::*;
pub use credential::*;
pub use keyword::*;
pub use project::*;
pub use rank_tracking::*;
pub use user::*;
pub use webhook::*;

use serde::{Deserialize, Deserializer};

/// Decimal columns arrive either as JSON numbers or as strings ("12.50").
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_credits_accept_string_decimal() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "owner@example.com",
            "api_credits_remaining": "12.50",
            "created_at": "2024-01-15T10:30:00Z"
        }))
        .unwrap();
        assert_eq!(user.api_credits_remaining, 12.5);
    }

    #[test]
    fn test_keyword_cpc_accepts_number_or_null() {
        let with_cpc: Keyword = serde_json::from_value(json!({
            "id": "k1",
            "keyword_text": "rust seo",
            "cpc": 1.25,
            "created_at": "2024-01-15T10:30:00Z"
        }))
        .unwrap();
        assert_eq!(with_cpc.cpc, Some(1.25));

        let without: Keyword = serde_json::from_value(json!({
            "id": "k2",
            "keyword_text": "rust crates",
            "cpc": null
        }))
        .unwrap();
        assert_eq!(without.cpc, None);
    }
}
