//! Configuration module for the SEO console.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when `SEO_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash
    pub api_url: String,
    /// Path to the SQLite file backing local storage
    pub state_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// How long a cached query result counts as fresh
    pub query_stale_time: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_url = env::var("SEO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let state_path = env::var("SEO_STATE_PATH")
            .unwrap_or_else(|_| "./data/client.sqlite".to_string())
            .into();

        let log_level = env::var("SEO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let stale_secs = env::var("SEO_QUERY_STALE_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            api_url: normalize_base_url(&api_url),
            state_path,
            log_level,
            query_stale_time: Duration::from_secs(stale_secs),
        }
    }

    /// Configuration pointing at an explicit backend, used by tests and embedders.
    pub fn new(api_url: &str, state_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_base_url(api_url),
            state_path: state_path.into(),
            log_level: "info".to_string(),
            query_stale_time: Duration::from_secs(30),
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SEO_API_URL");
        env::remove_var("SEO_STATE_PATH");
        env::remove_var("SEO_LOG_LEVEL");
        env::remove_var("SEO_QUERY_STALE_SECS");

        let config = Config::from_env();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.state_path, PathBuf::from("./data/client.sqlite"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.query_stale_time, Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::new("https://api.example.com/", "/tmp/state.sqlite");
        assert_eq!(config.api_url, "https://api.example.com");
    }
}
