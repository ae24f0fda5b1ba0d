//! Shared test utilities for SOGUM integration tests.
//!
//! Builders for configs pointing at wiremock servers, app state, and
//! response body helpers.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use sogum::api::{create_router, AppState};
use sogum::config::{ServiceConfig, SogumConfig};
use sogum::registry::ProbeStrategy;
use std::sync::Arc;
use wiremock::MockServer;

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

/// Service config whose health endpoint is served by `server`.
pub fn service_for(server: &MockServer, id: &str) -> ServiceConfig {
    let mut config = ServiceConfig::new(id, &format!("{} service", id), server.address().port());
    config.host = Some(server.address().ip().to_string());
    config
}

/// Same as [`service_for`] with the generation probe.
pub fn generation_service_for(server: &MockServer, id: &str) -> ServiceConfig {
    service_for(server, id).with_probe(ProbeStrategy::Generation)
}

/// Service config pointing at a port nothing listens on.
pub fn closed_service(id: &str) -> ServiceConfig {
    let mut config = ServiceConfig::new(id, id, 1);
    config.host = Some("127.0.0.1".to_string());
    config
}

/// Config with short deadlines, the given services, and the relay aimed at
/// `backend_host`.
pub fn test_config(services: Vec<ServiceConfig>, backend_host: &str) -> SogumConfig {
    let mut config = SogumConfig::default();
    config.services = services;
    config.relay.backend_host = backend_host.to_string();
    config.relay.generation_timeout_seconds = 2;
    config.health_check.timeout_ms = 500;
    config.health_check.probe_timeout_ms = 1000;
    config.health_check.host = "127.0.0.1".to_string();
    config
}

pub fn test_state(config: SogumConfig) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(config)).expect("valid test config"))
}

pub fn test_app(config: SogumConfig) -> axum::Router {
    create_router(test_state(config))
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
