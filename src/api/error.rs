//! Error payloads for the HTTP API.
//!
//! Every failure is returned as `{error, code, requestId?}`. The message is
//! always safe for clients; infrastructure detail only goes to the logs.

use crate::relay::RelayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// API error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, code: &str) -> Self {
        Self {
            status,
            error: message.into(),
            code: code.to_string(),
            request_id: None,
        }
    }

    /// Create a bad request error (400).
    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "invalid_input")
    }

    /// Create a not found error (404).
    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "not_found")
    }

    /// Create a rate limit error (429).
    pub fn rate_limited() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please try again later",
            "rate_limited",
        )
    }

    /// Map a relay failure to its public payload.
    pub fn from_relay(e: &RelayError, request_id: &str) -> Self {
        Self::new(relay_status(e), e.public_message(), e.code()).with_request_id(request_id)
    }

    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

fn relay_status(e: &RelayError) -> StatusCode {
    match e {
        RelayError::InvalidInput(_) | RelayError::InvalidModel(_) => StatusCode::BAD_REQUEST,
        RelayError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
