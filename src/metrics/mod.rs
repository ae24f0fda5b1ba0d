//! # Metrics Collection Module
//!
//! Process diagnostics and Prometheus export.
//!
//! ## Overview
//!
//! - `GET /metrics` - JSON process diagnostics (memory, uptime, timestamp)
//! - `GET /metrics/prometheus` - Prometheus text format metrics
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `sogum_relay_requests_total{outcome}` - Relay requests by outcome
//! - `sogum_health_checks_total{service, state}` - Health checks by result
//!
//! **Histograms:**
//! - `sogum_relay_duration_seconds` - Relay duration
//! - `sogum_health_check_latency_seconds{service}` - Health check latency
//!
//! **Gauges:**
//! - `sogum_services_total` - Registered services
//! - `sogum_services_online` - Services currently online

pub mod handler;
pub mod types;

pub use types::*;

// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::StatusTable;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Central coordinator for metrics collection and gauge computation.
pub struct MetricsCollector {
    /// Status table for computing service gauges
    table: Arc<StatusTable>,
    /// Startup time for uptime calculation
    start_time: Instant,
    /// Prometheus handle for rendering metrics
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    system: Mutex<System>,
    pid: Pid,
}

impl MetricsCollector {
    pub fn new(
        table: Arc<StatusTable>,
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            table,
            start_time,
            prometheus_handle,
            system: Mutex::new(System::new()),
            pid: Pid::from_u32(std::process::id()),
        }
    }

    /// Update service gauges from the status table.
    pub fn update_service_gauges(&self) {
        let summary = self.table.summary();
        metrics::gauge!("sogum_services_total").set(summary.total as f64);
        metrics::gauge!("sogum_services_online").set(summary.online as f64);
    }

    /// Seconds since startup, with sub-second precision.
    pub fn uptime(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Current memory usage of this process. Zeroes if the platform
    /// doesn't expose it.
    pub fn memory(&self) -> MemoryStats {
        let mut system = self.system.lock().unwrap_or_else(|e| e.into_inner());
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        system
            .process(self.pid)
            .map(|p| MemoryStats {
                rss_bytes: p.memory(),
                virtual_bytes: p.virtual_memory(),
            })
            .unwrap_or_default()
    }

    pub fn process_metrics(&self) -> ProcessMetrics {
        ProcessMetrics {
            memory: self.memory(),
            uptime: self.uptime(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize the Prometheus exporter with latency-oriented buckets.
///
/// Buckets (seconds): [0.01, 0.05, 0.1, 0.25, 0.5, 1, 2.5, 5, 10, 30, 60, 120].
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let duration_buckets = &[
        0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
    ];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("sogum_relay_duration_seconds".to_string()),
            duration_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("sogum_health_check_latency_seconds".to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Install the global recorder, or build a detached handle when one is
/// already installed (e.g. several app states in one test binary).
pub fn metrics_handle() -> metrics_exporter_prometheus::PrometheusHandle {
    setup_metrics().unwrap_or_else(|e| {
        tracing::debug!("Metrics already initialized, creating new handle: {}", e);
        PrometheusBuilder::new().build_recorder().handle()
    })
}
