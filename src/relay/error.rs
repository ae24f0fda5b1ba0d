//! Error types for the chat relay.

use thiserror::Error;

/// Failures reported by a [`GenerationBackend`](super::GenerationBackend).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Connection refused, host unreachable, DNS failure
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// Deadline passed before the backend answered
    #[error("backend timeout after {0}ms")]
    Timeout(u64),

    /// Backend answered 404 for the requested model
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Any other non-2xx response
    #[error("backend error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// 2xx with a body that doesn't match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport failure other than connecting
    #[error("request failed: {0}")]
    Transport(String),
}

/// Errors returned by [`ChatRelay::relay`](super::ChatRelay::relay).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Caller error, detected before any downstream call
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Requested model doesn't exist on the backend
    #[error("model not found: {0}")]
    InvalidModel(String),

    #[error("generation timed out after {0}ms")]
    Timeout(u64),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::InvalidModel(_) => "invalid_model",
            Self::Timeout(_) => "timeout",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show the caller. Infrastructure detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::InvalidModel(model) => format!("Model '{}' not found", model),
            Self::BackendUnavailable(_) => "Generation backend is unavailable".to_string(),
            Self::Timeout(_) => "Generation request timed out".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<BackendError> for RelayError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Unreachable(detail) => Self::BackendUnavailable(detail),
            BackendError::Timeout(ms) => Self::Timeout(ms),
            BackendError::ModelNotFound(model) => Self::InvalidModel(model),
            other => Self::Internal(other.to_string()),
        }
    }
}
