//! # Metrics Types
//!
//! Data structures for the JSON diagnostics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON response for GET /metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub memory: MemoryStats,
    /// Seconds since startup
    pub uptime: f64,
    pub timestamp: DateTime<Utc>,
}

/// Memory usage of this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Resident set size in bytes
    pub rss_bytes: u64,
    /// Virtual memory size in bytes
    pub virtual_bytes: u64,
}
