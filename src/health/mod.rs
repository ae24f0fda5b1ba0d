//! Health polling module.
//!
//! The [`Poller`] checks every registered service on a fixed interval and
//! owns the [`StatusTable`] that readers render from.

mod config;
mod error;
pub mod probe;
mod state;
mod table;


pub use config::*;
pub use error::*;
pub use probe::ProbeOutcome;
pub use state::*;
pub use table::StatusTable;

use crate::registry::{ProbeStrategy, RegistryError, ServiceDescriptor, ServiceRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Background service that periodically checks service health.
pub struct Poller {
    registry: Arc<ServiceRegistry>,
    /// HTTP client with connection pooling
    client: reqwest::Client,
    config: HealthCheckConfig,
    table: Arc<StatusTable>,
    /// Optional WebSocket broadcast sender for dashboard updates
    ws_broadcast: Option<broadcast::Sender<StatusUpdate>>,
}

impl Poller {
    /// Create a poller with a fresh status table.
    pub fn new(registry: Arc<ServiceRegistry>, config: HealthCheckConfig) -> Self {
        Self::with_client(registry, config, reqwest::Client::new())
    }

    /// Create a poller with a custom HTTP client.
    pub fn with_client(
        registry: Arc<ServiceRegistry>,
        config: HealthCheckConfig,
        client: reqwest::Client,
    ) -> Self {
        let table = Arc::new(StatusTable::new(&registry));
        Self {
            registry,
            client,
            config,
            table,
            ws_broadcast: None,
        }
    }

    /// Set the WebSocket broadcast sender for dashboard updates.
    pub fn with_broadcast(mut self, sender: broadcast::Sender<StatusUpdate>) -> Self {
        self.ws_broadcast = Some(sender);
        self
    }

    /// Read handle to the status table.
    pub fn table(&self) -> Arc<StatusTable> {
        Arc::clone(&self.table)
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Check one service's health endpoint. Never fails: every problem
    /// becomes an `Offline` result.
    pub async fn check_health(&self, service: &ServiceDescriptor) -> HealthCheckResult {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let result = probe::get_health(&self.client, &service.health_url(), timeout).await;

        match &result {
            HealthCheckResult::Online { latency_ms } => {
                metrics::histogram!("sogum_health_check_latency_seconds",
                    "service" => service.id.clone()
                )
                .record(*latency_ms as f64 / 1000.0);
            }
            HealthCheckResult::Offline { error } => {
                tracing::debug!(
                    service_id = %service.id,
                    url = %service.health_url(),
                    error = %error,
                    "Health check failed"
                );
            }
        }
        metrics::counter!("sogum_health_checks_total",
            "service" => service.id.clone(),
            "state" => if result.is_online() { "online" } else { "offline" }
        )
        .increment(1);

        result
    }

    /// Write a result into the status table, logging state transitions.
    pub fn apply_result(&self, service_id: &str, result: &HealthCheckResult) {
        let Some(previous) = self.table.record(service_id, result) else {
            tracing::warn!(service_id, "Ignoring result for unregistered service");
            return;
        };

        let new_state = result.state();
        if previous != new_state {
            tracing::info!(
                service_id,
                old_state = ?previous,
                new_state = ?new_state,
                "Service status changed"
            );
        }
    }

    /// Check every registered service once.
    ///
    /// Checks run concurrently, so a slow service only costs its own
    /// deadline. Subscribers get a full snapshot once the cycle is done.
    pub async fn poll_all(&self) -> Vec<(String, HealthCheckResult)> {
        let checks = self.registry.all().iter().map(|service| async move {
            let result = self.check_health(service).await;
            self.apply_result(&service.id, &result);
            (service.id.clone(), result)
        });
        let results = futures::future::join_all(checks).await;

        if let Some(sender) = &self.ws_broadcast {
            // No receivers is fine
            let _ = sender.send(StatusUpdate::service_status(self.table.snapshot()));
        }

        results
    }

    /// On-demand deep probe of one service.
    ///
    /// Services with the generation strategy get a real prompt round-trip;
    /// the rest get the shallow health check. The status table is not touched.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ServiceNotFound` for an unknown id.
    pub async fn test_service(&self, service_id: &str) -> Result<ProbeOutcome, RegistryError> {
        let service = self.registry.require(service_id)?;
        let timeout = Duration::from_millis(self.config.probe_timeout_ms);

        let outcome = match service.probe {
            ProbeStrategy::Generation => {
                probe::post_generation(&self.client, &service.ask_url(), timeout).await
            }
            ProbeStrategy::Health => {
                probe::get_health(&self.client, &service.health_url(), timeout)
                    .await
                    .into()
            }
        };

        tracing::info!(
            service_id,
            probe = ?service.probe,
            success = outcome.is_success(),
            "Service test completed"
        );

        Ok(outcome)
    }

    /// Start the poll loop as a background task.
    ///
    /// The first cycle runs immediately. A cycle that overruns the interval
    /// pushes the next one back rather than overlapping it.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            tracing::info!(
                interval_seconds = self.config.interval_seconds,
                services = self.registry.len(),
                "Health poller started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health poller shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let results = self.poll_all().await;
                        let online = results.iter().filter(|(_, r)| r.is_online()).count();
                        tracing::debug!(
                            services_checked = results.len(),
                            online,
                            "Poll cycle completed"
                        );
                    }
                }
            }
        })
    }
}
