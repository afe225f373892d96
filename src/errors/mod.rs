//! Error handling module for the SEO console.
//!
//! Maps backend HTTP statuses and local failures onto one error type with
//! stable codes and a message fit for inline display.

use reqwest::StatusCode;
use serde::Deserialize;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONFLICT: &str = "CONFLICT";
    pub const API_ERROR: &str = "API_ERROR";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// The backend rejected the session (HTTP 401)
    Unauthorized(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Rejected input, either locally or by the backend (HTTP 400/422)
    Validation(String),
    /// Resource already exists (HTTP 409)
    Conflict(String),
    /// Any other non-success status
    Api { status: u16, message: String },
    /// Connection or protocol failure before a status was received
    Transport(String),
    /// Response body did not match the expected schema
    Decode(String),
    /// Local storage failure
    Storage(String),
}

impl ClientError {
    /// Build an error from a non-success status and the raw response body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = detail_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            StatusCode::CONFLICT => ClientError::Conflict(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Get the HTTP status this error corresponds to, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::NotFound(_) => Some(404),
            ClientError::Validation(_) => Some(400),
            ClientError::Conflict(_) => Some(409),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(_) | ClientError::Decode(_) | ClientError::Storage(_) => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Conflict(_) => codes::CONFLICT,
            ClientError::Api { .. } => codes::API_ERROR,
            ClientError::Transport(_) => codes::TRANSPORT_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Storage(_) => codes::STORAGE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized(msg) => msg.clone(),
            ClientError::NotFound(msg) => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Conflict(msg) => msg.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Transport(msg) => msg.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Storage(msg) => msg.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        if err.is_decode() {
            ClientError::Decode(format!("Response decode error: {}", err))
        } else {
            ClientError::Transport(format!("HTTP error: {}", err))
        }
    }
}

impl From<sqlx::Error> for ClientError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ClientError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

/// FastAPI-style error body: `{"detail": "..."}` or a list of validation issues.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extract the human-readable `detail` from an error body, if there is one.
pub fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let err = ClientError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Project not found"}"#,
        );
        assert_eq!(err.error_code(), codes::NOT_FOUND);
        assert_eq!(err.message(), "Project not found");
    }

    #[test]
    fn test_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "domain"], "msg": "field required"}]}"#;
        let err = ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.message(), "field required");
    }

    #[test]
    fn test_missing_detail_falls_back_to_reason() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.message(), "Bad Gateway");
    }

    #[test]
    fn test_display_includes_code() {
        let err = ClientError::Unauthorized("Could not validate credentials".to_string());
        assert_eq!(
            err.to_string(),
            "UNAUTHORIZED: Could not validate credentials"
        );
        assert!(err.is_unauthorized());
    }
}
