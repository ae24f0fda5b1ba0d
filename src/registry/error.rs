/// Errors that can occur during registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("service already registered: {0}")]
    DuplicateService(String),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("invalid service '{id}': {reason}")]
    InvalidService { id: String, reason: String },
}
