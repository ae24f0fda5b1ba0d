//! Chat relay endpoint handler.

use crate::api::{ApiError, AppState};
use crate::logging::{generate_request_id, middleware::REQUEST_ID_HEADER};
use crate::relay::RelayOptions;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Body of POST /ask.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// POST /ask - relay one prompt to the generation backend.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let request_id = generate_request_id();

    let response = match payload {
        Ok(Json(request)) => {
            let options = RelayOptions {
                model: request.model,
                temperature: request.temperature,
            };
            match state.relay.relay(&request_id, &request.prompt, &options).await {
                Ok(answer) => Json(answer).into_response(),
                Err(e) => ApiError::from_relay(&e, &request_id).into_response(),
            }
        }
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, error = %rejection, "Malformed ask body");
            ApiError::bad_request("Request body must be JSON with a string 'prompt'")
                .with_request_id(&request_id)
                .into_response()
        }
    };

    with_request_id(response, &request_id)
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
