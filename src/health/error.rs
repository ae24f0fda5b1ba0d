//! Error types for health checking.

use thiserror::Error;

/// Reasons a health check classified a service as offline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthCheckError {
    /// No response before the deadline
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Connection refused, unreachable host, or DNS failure
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Response with a non-2xx status
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Any other transport failure
    #[error("request failed: {0}")]
    Request(String),
}

impl HealthCheckError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}
