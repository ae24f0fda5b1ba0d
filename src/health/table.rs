//! The status table owned by the poller.

use super::state::{HealthCheckResult, ServiceState, ServiceStatus, StatusSummary};
use crate::registry::ServiceRegistry;
use dashmap::DashMap;

/// One status record per registered service.
///
/// Seeded with `Unknown` records at construction; records are replaced,
/// never added or removed, so the key set always matches the registry.
/// Readers get clones and never see a partially written record.
#[derive(Debug)]
pub struct StatusTable {
    order: Vec<String>,
    entries: DashMap<String, ServiceStatus>,
}

impl StatusTable {
    pub fn new(registry: &ServiceRegistry) -> Self {
        let order: Vec<String> = registry.ids().map(String::from).collect();
        let entries = order
            .iter()
            .map(|id| (id.clone(), ServiceStatus::unknown(id)))
            .collect();
        Self { order, entries }
    }

    /// Replace a service's record with the outcome of a check.
    ///
    /// Returns the previous state, or `None` for an id that isn't registered
    /// (the table is left unchanged).
    pub fn record(&self, service_id: &str, result: &HealthCheckResult) -> Option<ServiceState> {
        let mut entry = self.entries.get_mut(service_id)?;
        let previous = entry.state;
        *entry = ServiceStatus::from_result(service_id, result, chrono::Utc::now());
        Some(previous)
    }

    pub fn get(&self, service_id: &str) -> Option<ServiceStatus> {
        self.entries.get(service_id).map(|e| e.value().clone())
    }

    /// All records in registry order.
    pub fn snapshot(&self) -> Vec<ServiceStatus> {
        self.order.iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_statuses(&self.snapshot())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
