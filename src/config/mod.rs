//! Configuration module for the SOGUM dashboard core
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SOGUM_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use sogum::config::SogumConfig;
//!
//! let config = SogumConfig::default();
//! assert_eq!(config.server.port, 3001);
//!
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: SogumConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! assert_eq!(config.services.len(), 10);
//! ```

pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod relay;
pub mod server;
pub mod service;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use relay::RelayConfig;
pub use server::ServerConfig;
pub use service::{default_services, ServiceConfig};

// Re-export HealthCheckConfig from health module
pub use crate::health::HealthCheckConfig;

use crate::registry::ServiceRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the dashboard core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SogumConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Generation backend settings for the chat relay
    pub relay: RelayConfig,
    /// Poller settings
    pub health_check: HealthCheckConfig,
    /// Per-IP limit on `/ask`
    pub rate_limit: RateLimitConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Monitored services, in display order
    pub services: Vec<ServiceConfig>,
}

impl Default for SogumConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            relay: RelayConfig::default(),
            health_check: HealthCheckConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
            services: default_services(),
        }
    }
}

impl SogumConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("SOGUM_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("SOGUM_HOST") {
            self.server.host = host;
        }
        if let Ok(origins) = std::env::var("SOGUM_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(level) = std::env::var("SOGUM_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SOGUM_LOG_FORMAT") {
            if let Some(f) = LogFormat::from_name(&format) {
                self.logging.format = f;
            }
        }

        if let Ok(host) = std::env::var("SOGUM_BACKEND_HOST") {
            self.relay.backend_host = host;
        }
        if let Ok(model) = std::env::var("SOGUM_BACKEND_MODEL") {
            self.relay.model = model;
        }

        if let Ok(window) = std::env::var("SOGUM_RATE_LIMIT_WINDOW_MS") {
            if let Ok(w) = window.parse() {
                self.rate_limit.window_ms = w;
            }
        }
        if let Ok(max) = std::env::var("SOGUM_RATE_LIMIT_MAX") {
            if let Ok(m) = max.parse() {
                self.rate_limit.max = m;
            }
        }

        if let Ok(health) = std::env::var("SOGUM_HEALTH_CHECK") {
            self.health_check.enabled = health.to_lowercase() == "true";
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "port must be non-zero",
            ));
        }

        let host = &self.relay.backend_host;
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ConfigError::validation(
                "relay.backend_host",
                "must start with http:// or https://",
            ));
        }
        if self.relay.model.trim().is_empty() {
            return Err(ConfigError::validation(
                "relay.model",
                "model cannot be empty",
            ));
        }
        if self.relay.max_prompt_chars == 0 {
            return Err(ConfigError::validation(
                "relay.max_prompt_chars",
                "must be greater than zero",
            ));
        }
        if self.relay.generation_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "relay.generation_timeout_seconds",
                "must be greater than zero",
            ));
        }

        if self.health_check.interval_seconds == 0 {
            return Err(ConfigError::validation(
                "health_check.interval_seconds",
                "must be greater than zero",
            ));
        }
        if self.health_check.timeout_ms == 0 || self.health_check.probe_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "health_check.timeout_ms",
                "timeouts must be greater than zero",
            ));
        }

        if self.rate_limit.enabled && (self.rate_limit.window_ms == 0 || self.rate_limit.max == 0)
        {
            return Err(ConfigError::validation(
                "rate_limit",
                "window_ms and max must be greater than zero",
            ));
        }

        ServiceRegistry::from_configs(&self.services, &self.health_check.host)
            .map_err(|e| ConfigError::validation("services", &e.to_string()))?;

        Ok(())
    }
}
