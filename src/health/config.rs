//! Configuration for health polling.

use serde::{Deserialize, Serialize};

/// Configuration for service health polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Whether the background poll loop runs
    pub enabled: bool,
    /// Seconds between poll cycles
    pub interval_seconds: u64,
    /// Deadline for each health request
    pub timeout_ms: u64,
    /// Deadline for on-demand deep probes
    pub probe_timeout_ms: u64,
    /// Host used for services that don't set their own
    pub host: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 30,
            timeout_ms: 2000,
            probe_timeout_ms: 10_000,
            host: "localhost".to_string(),
        }
    }
}
