//! Liveness and index endpoint handlers.

use crate::api::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup
    pub uptime: f64,
}

/// GET /health - the relay process itself is up.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        uptime: state.start_time.elapsed().as_secs_f64(),
    })
}

/// Service index response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

pub const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /metrics",
    "GET /metrics/prometheus",
    "POST /ask",
    "GET /v1/services",
    "GET /v1/services/{id}",
    "POST /v1/services/{id}/test",
    "POST /v1/services/refresh",
    "GET /ws",
];

/// GET / - name, version and available endpoints.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "SOGUM Dashboard Core",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS.to_vec(),
    })
}
