//! Status command implementation

use crate::api::ServicesResponse;
use crate::cli::output::{format_services_json, format_services_table, format_summary};
use crate::cli::{load_config, StatusArgs};
use crate::health::Poller;
use crate::registry::ServiceRegistry;
use std::sync::Arc;

/// Run one poll cycle over the configured services.
pub async fn collect_status(poller: &Poller) -> ServicesResponse {
    poller.poll_all().await;
    ServicesResponse::collect(poller.registry(), &poller.table())
}

/// Render a status response as a table with a summary line, or as JSON.
pub fn render_status(
    response: &ServicesResponse,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        return Ok(format_services_json(response)?);
    }
    Ok(format!(
        "{}\n{}",
        format_services_table(&response.services),
        format_summary(&response.summary)
    ))
}

/// Handle `sogum status`
pub async fn handle_status(args: &StatusArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let registry = Arc::new(ServiceRegistry::from_configs(
        &config.services,
        &config.health_check.host,
    )?);
    let poller = Poller::new(registry, config.health_check.clone());

    let response = collect_status(&poller).await;
    render_status(&response, args.json)
}
