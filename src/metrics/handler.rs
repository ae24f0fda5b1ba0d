//! # Metrics HTTP Handlers
//!
//! Axum handlers for metrics endpoints.

use crate::api::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Handler for GET /metrics (JSON process diagnostics).
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.metrics_collector.process_metrics())
}

/// Handler for GET /metrics/prometheus (Prometheus text format).
///
/// Always returns 200 with the scraper content type, even before any
/// metric has been recorded.
pub async fn prometheus_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics_collector.update_service_gauges();

    let metrics = state.metrics_collector.render_metrics();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics,
    )
}
