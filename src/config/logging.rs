//! `[logging]` section

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Case-insensitive lookup used by the `SOGUM_LOG_FORMAT` override.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter level
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels under `sogum::`, keyed by module (`health`, `relay`, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<String, String>,
    /// Log a 100-character preview of each relayed prompt
    pub enable_content_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
            enable_content_logging: false,
        }
    }
}
