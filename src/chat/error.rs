use thiserror::Error;

/// Failures talking to a running relay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("cannot connect to relay: {0}")]
    Connect(String),

    #[error("relay request timed out after {0}ms")]
    Timeout(u64),

    /// Relay answered with a non-2xx status
    #[error("relay error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("invalid relay response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Conversational reply shown in place of the error.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Http { .. } => {
                "Sorry, the LLM service is currently unavailable. Please try again later."
            }
            Self::Connect(_) | Self::Timeout(_) | Self::InvalidResponse(_) => {
                "Sorry, the AI service is currently unavailable. All microservices need to be started first."
            }
        }
    }
}
