use serde::{Deserialize, Serialize};

/// How the on-demand `test` action probes a service.
///
/// Chosen once per service when the registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// Same GET against the health endpoint as the poller
    #[default]
    Health,
    /// Round-trip generation call against the service's `/ask` endpoint
    Generation,
}

/// A monitored network service.
///
/// Immutable once constructed; the registry hands out shared references.
///
/// # Examples
///
/// ```
/// use sogum::registry::{ProbeStrategy, ServiceDescriptor};
///
/// let ocr = ServiceDescriptor::new("ocr", "OCR Service", "localhost", 8080, "/health", ProbeStrategy::Health);
/// assert_eq!(ocr.health_url(), "http://localhost:8080/health");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    /// Stable identifier (e.g. "ocr")
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    pub host: String,
    pub port: u16,
    /// Path of the health endpoint, starting with `/`
    pub health_path: String,
    pub probe: ProbeStrategy,
}

impl ServiceDescriptor {
    pub fn new(
        id: &str,
        display_name: &str,
        host: &str,
        port: u16,
        health_path: &str,
        probe: ProbeStrategy,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            host: host.to_string(),
            port,
            health_path: health_path.to_string(),
            probe,
        }
    }

    /// `http://<host>:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// `http://<host>:<port><health_path>`
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url(), self.health_path)
    }

    /// Endpoint hit by the generation probe.
    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url())
    }
}
