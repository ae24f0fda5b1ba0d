//! Service Registry module.
//!
//! Holds the fixed set of monitored services, built once at startup.

mod error;
mod service;

pub use error::*;
pub use service::*;

use crate::config::ServiceConfig;
use std::collections::HashMap;

/// The registry of monitored services.
///
/// Services keep their configuration order, which is also the order in
/// which snapshots are rendered. Lookups by id go through an index.
///
/// # Examples
///
/// ```
/// use sogum::config::ServiceConfig;
/// use sogum::registry::{ProbeStrategy, ServiceRegistry};
///
/// let configs = vec![
///     ServiceConfig::new("ocr", "OCR Service", 8080),
///     ServiceConfig::new("llm", "Anything LLM", 3001).with_probe(ProbeStrategy::Generation),
/// ];
/// let registry = ServiceRegistry::from_configs(&configs, "localhost").unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.get("llm").unwrap().probe, ProbeStrategy::Generation);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<ServiceDescriptor>,
    index: HashMap<String, usize>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from service configs.
    ///
    /// Services without an explicit host use `default_host`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateService` on a repeated id and
    /// `RegistryError::InvalidService` on an empty id, port 0, or a health
    /// path that does not start with `/`.
    pub fn from_configs(
        configs: &[ServiceConfig],
        default_host: &str,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for config in configs {
            let host = config.host.as_deref().unwrap_or(default_host);
            registry.add(ServiceDescriptor::new(
                &config.id,
                &config.name,
                host,
                config.port,
                &config.health_path,
                config.probe,
            ))?;
        }
        Ok(registry)
    }

    /// Add a service.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceRegistry::from_configs`].
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidService {
            id: descriptor.id.clone(),
            reason: reason.to_string(),
        };

        if descriptor.id.trim().is_empty() {
            return Err(invalid("id cannot be empty"));
        }
        if descriptor.port == 0 {
            return Err(invalid("port must be non-zero"));
        }
        if !descriptor.health_path.starts_with('/') {
            return Err(invalid("health_path must start with '/'"));
        }
        if self.index.contains_key(&descriptor.id) {
            return Err(RegistryError::DuplicateService(descriptor.id));
        }

        self.index
            .insert(descriptor.id.clone(), self.services.len());
        self.services.push(descriptor);
        Ok(())
    }

    /// Get a service by id.
    pub fn get(&self, id: &str) -> Option<&ServiceDescriptor> {
        self.index.get(id).map(|&i| &self.services[i])
    }

    /// Get a service by id, or `ServiceNotFound`.
    pub fn require(&self, id: &str) -> Result<&ServiceDescriptor, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::ServiceNotFound(id.to_string()))
    }

    /// All services in registration order.
    pub fn all(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
