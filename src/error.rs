//! Error types for OrgSearch
//!
//! Every failure the organizer backend can produce maps onto one of these
//! variants so the controller can turn it into a `Failed` result set.

use std::time::Duration;

use thiserror::Error;

/// Main error type for OrgSearch operations
#[derive(Error, Debug)]
pub enum OrgSearchError {
    #[error("Organizer backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Organizer backend error: {0}")]
    BackendError(String),

    #[error("Malformed response from organizer backend: {0}")]
    MalformedResponse(String),

    #[error("Request timeout after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// A one-shot query settled as `Failed`; holds the result set's message
    #[error("{0}")]
    QueryFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for OrgSearch operations
pub type Result<T> = std::result::Result<T, OrgSearchError>;

impl OrgSearchError {
    /// Classify a transport error raised by the HTTP client.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            OrgSearchError::Timeout(timeout)
        } else if err.is_connect() {
            OrgSearchError::BackendUnreachable(err.to_string())
        } else if err.is_decode() {
            OrgSearchError::MalformedResponse(err.to_string())
        } else {
            OrgSearchError::BackendUnreachable(err.to_string())
        }
    }

    /// Check if this error came from talking to the backend (the controller
    /// recovers from these and stays usable; the CLI adds a hint)
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            OrgSearchError::BackendUnreachable(_)
                | OrgSearchError::BackendError(_)
                | OrgSearchError::MalformedResponse(_)
                | OrgSearchError::Timeout(_)
                | OrgSearchError::QueryFailed(_)
        )
    }
}
