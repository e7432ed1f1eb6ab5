//! API Error Types
//!
//! One error type for every backend call, whether it goes through the
//! `/api/cpa/*` loaders or the `/api/core/*` helper.

use thiserror::Error;

/// Errors that can occur when talking to the CPA backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure (connection refused, DNS, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-2xx response
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The body could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Extract a human-readable message from an error response body
///
/// Looks for `error`, `message` or `detail` (string, or an object with a
/// `message`), falling back to "Request failed with status N".
pub fn error_message(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status);

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    for key in ["error", "message", "detail"] {
        match value.get(key) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(serde_json::Value::Object(obj)) => {
                if let Some(serde_json::Value::String(s)) = obj.get("message") {
                    return s.clone();
                }
            }
            _ => {}
        }
    }

    fallback()
}
