//! Request ID generation

use uuid::Uuid;

/// Header carrying the correlation id on relay responses.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use sogum::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_id_format() {
        let id = generate_request_id();
        // UUID v4 format: xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|&c| c == '-').count(), 4);
    }

    #[test]
    fn test_generate_request_id_uniqueness() {
        assert_ne!(generate_request_id(), generate_request_id());
    }

    #[test]
    fn test_generate_request_id_parseable() {
        assert!(Uuid::parse_str(&generate_request_id()).is_ok());
    }
}
