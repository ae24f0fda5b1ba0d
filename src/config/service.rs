//! Monitored service configuration

use crate::registry::ProbeStrategy;
use serde::{Deserialize, Serialize};

/// One monitored service as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub id: String,
    pub name: String,
    pub port: u16,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Overrides `health_check.host` for this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default)]
    pub probe: ProbeStrategy,
}

fn default_health_path() -> String {
    "/health".to_string()
}

impl ServiceConfig {
    pub fn new(id: &str, name: &str, port: u16) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            port,
            health_path: default_health_path(),
            host: None,
            probe: ProbeStrategy::Health,
        }
    }

    pub fn with_probe(mut self, probe: ProbeStrategy) -> Self {
        self.probe = probe;
        self
    }
}

/// The dashboard's built-in service set.
pub fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig::new("ocr", "OCR Service", 8080),
        ServiceConfig::new("llm", "Anything LLM", 3001).with_probe(ProbeStrategy::Generation),
        ServiceConfig::new("docetl", "DocETL", 5000),
        ServiceConfig::new("organizer", "File Organizer", 4000),
        ServiceConfig::new("json", "JSON Crack", 3000),
        ServiceConfig::new("kestra", "Kestra", 8082),
        ServiceConfig::new("windmill", "Windmill", 7780),
        ServiceConfig::new("localsend", "Local Send", 5050),
        ServiceConfig::new("pake", "PAKE Security", 8081),
        ServiceConfig::new("email-router", "Email Router", 5001),
    ]
}
