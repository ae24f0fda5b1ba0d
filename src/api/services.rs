//! Read-only views of the status table, plus the on-demand test and refresh
//! actions.

use crate::api::{ApiError, AppState};
use crate::health::{ProbeOutcome, ServiceStatus, StatusSummary, StatusTable};
use crate::registry::{ServiceDescriptor, ServiceRegistry};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// One service with its latest status.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEntry {
    #[serde(flatten)]
    pub service: ServiceDescriptor,
    pub status: ServiceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicesResponse {
    pub summary: StatusSummary,
    pub services: Vec<ServiceEntry>,
}

/// Result of POST /v1/services/{id}/test.
#[derive(Debug, Clone, Serialize)]
pub struct TestResponse {
    pub service: String,
    /// "success" or "failure"
    pub result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TestResponse {
    pub fn new(service_id: &str, outcome: ProbeOutcome) -> Self {
        let (result, latency_ms, reason) = match outcome {
            ProbeOutcome::Success { latency_ms } => ("success", Some(latency_ms), None),
            ProbeOutcome::Failure { reason } => ("failure", None, Some(reason)),
        };
        Self {
            service: service_id.to_string(),
            result,
            latency_ms,
            reason,
        }
    }
}

impl ServiceEntry {
    fn new(service: &ServiceDescriptor, table: &StatusTable) -> Self {
        let status = table
            .get(&service.id)
            .unwrap_or_else(|| ServiceStatus::unknown(&service.id));
        Self {
            service: service.clone(),
            status,
        }
    }
}

impl ServicesResponse {
    /// Every registered service, in registry order, with its latest status.
    pub fn collect(registry: &ServiceRegistry, table: &StatusTable) -> Self {
        let services: Vec<ServiceEntry> = registry
            .all()
            .iter()
            .map(|service| ServiceEntry::new(service, table))
            .collect();
        let summary = StatusSummary::from_statuses(services.iter().map(|e| &e.status));
        Self { summary, services }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(&format!("Service '{}' not found", id))
}

/// GET /v1/services
pub async fn list(State(state): State<Arc<AppState>>) -> Json<ServicesResponse> {
    Json(ServicesResponse::collect(&state.registry, &state.poller.table()))
}

/// GET /v1/services/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceEntry>, ApiError> {
    let service = state.registry.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(ServiceEntry::new(service, &state.poller.table())))
}

/// POST /v1/services/{id}/test - deep probe, leaves the status table alone.
pub async fn test(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TestResponse>, ApiError> {
    let outcome = state
        .poller
        .test_service(&id)
        .await
        .map_err(|_| not_found(&id))?;
    Ok(Json(TestResponse::new(&id, outcome)))
}

/// POST /v1/services/refresh - run one poll cycle now.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<ServicesResponse> {
    state.poller.poll_all().await;
    Json(ServicesResponse::collect(&state.registry, &state.poller.table()))
}
