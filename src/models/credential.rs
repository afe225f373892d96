//! Third-party API credentials stored server-side per user.

use serde::{Deserialize, Serialize};

/// External services the backend calls on the user's behalf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    DataForSeo,
    Google,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::DataForSeo => "dataforseo",
            Provider::Google => "google",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dataforseo" => Some(Provider::DataForSeo),
            "google" => Some(Provider::Google),
            "anthropic" => Some(Provider::Anthropic),
            _ => None,
        }
    }

    pub fn all() -> [Provider; 3] {
        [Provider::DataForSeo, Provider::Google, Provider::Anthropic]
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer from `GET /api/credentials/check/:provider`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialCheck {
    pub exists: bool,
    pub provider: String,
    #[serde(default)]
    pub last_verified: Option<String>,
}

/// Credential metadata. The secret itself never leaves the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialInfo {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_verified_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetupResult {
    #[serde(default)]
    pub success: bool,
    pub provider: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub credential: Option<CredentialInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip_names() {
        for provider in Provider::all() {
            assert_eq!(Provider::from_str(provider.as_str()), Some(provider));
        }
        assert_eq!(Provider::from_str(" DataForSEO "), Some(Provider::DataForSeo));
        assert_eq!(Provider::from_str("openai"), None);
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        let json = serde_json::to_string(&Provider::DataForSeo).unwrap();
        assert_eq!(json, "\"dataforseo\"");
    }
}
