//! Test command implementation (deep probe)

use crate::cli::{load_config, TestArgs};
use crate::health::{Poller, ProbeOutcome};
use crate::registry::ServiceRegistry;
use colored::Colorize;
use std::sync::Arc;

/// Deep probe one service.
///
/// # Errors
///
/// An unknown id or a failed probe, so the process exits non-zero.
pub async fn run_test(poller: &Poller, id: &str) -> Result<String, Box<dyn std::error::Error>> {
    let service = poller.registry().require(id)?;
    let name = service.display_name.clone();

    match poller.test_service(id).await? {
        ProbeOutcome::Success { latency_ms } => Ok(format!(
            "{} {} is working ({}ms)",
            "✓".green(),
            name,
            latency_ms
        )),
        ProbeOutcome::Failure { reason } => {
            Err(format!("{} test failed: {}", name, reason).into())
        }
    }
}

/// Handle `sogum test <ID>`
pub async fn handle_test(args: &TestArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let registry = Arc::new(ServiceRegistry::from_configs(
        &config.services,
        &config.health_check.host,
    )?);
    let poller = Poller::new(registry, config.health_check.clone());
    run_test(&poller, &args.id).await
}
