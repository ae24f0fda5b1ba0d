//! Per-service status records.

use super::error::HealthCheckError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness state of one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// Not checked yet
    Unknown,
    Online,
    Offline,
}

/// Result of one health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheckResult {
    /// 2xx response within the deadline
    Online { latency_ms: u32 },
    /// Timeout, transport failure, or non-2xx status
    Offline { error: HealthCheckError },
}

impl HealthCheckResult {
    pub fn state(&self) -> ServiceState {
        match self {
            Self::Online { .. } => ServiceState::Online,
            Self::Offline { .. } => ServiceState::Offline,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online { .. })
    }
}

/// Latest known status of one service.
///
/// Always replaced as a whole, so every field comes from the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service_id: String,
    pub state: ServiceState,
    /// When the last check completed
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ServiceStatus {
    /// Status before the first check.
    pub fn unknown(service_id: &str) -> Self {
        Self {
            service_id: service_id.to_string(),
            state: ServiceState::Unknown,
            last_checked_at: None,
            latency_ms: None,
            last_error: None,
        }
    }

    pub fn from_result(service_id: &str, result: &HealthCheckResult, at: DateTime<Utc>) -> Self {
        let (latency_ms, last_error) = match result {
            HealthCheckResult::Online { latency_ms } => (Some(*latency_ms), None),
            HealthCheckResult::Offline { error } => (None, Some(error.to_string())),
        };
        Self {
            service_id: service_id.to_string(),
            state: result.state(),
            last_checked_at: Some(at),
            latency_ms,
            last_error,
        }
    }
}

/// Overall label for the whole service set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every service online
    Healthy,
    /// Some services online
    Degraded,
    /// No service online
    Offline,
}

/// Service counts by state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub status: OverallStatus,
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub unknown: usize,
}

impl StatusSummary {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a ServiceStatus>) -> Self {
        let (mut total, mut online, mut offline, mut unknown) = (0, 0, 0, 0);
        for status in statuses {
            total += 1;
            match status.state {
                ServiceState::Online => online += 1,
                ServiceState::Offline => offline += 1,
                ServiceState::Unknown => unknown += 1,
            }
        }

        let status = match (online, total) {
            (o, t) if o == t && t > 0 => OverallStatus::Healthy,
            (o, _) if o > 0 => OverallStatus::Degraded,
            _ => OverallStatus::Offline,
        };

        Self {
            status,
            total,
            online,
            offline,
            unknown,
        }
    }
}

/// Snapshot pushed to WebSocket subscribers after each poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(rename = "type")]
    pub update_type: String,
    pub data: Vec<ServiceStatus>,
}

impl StatusUpdate {
    pub fn service_status(data: Vec<ServiceStatus>) -> Self {
        Self {
            update_type: "service_status".to_string(),
            data,
        }
    }
}
