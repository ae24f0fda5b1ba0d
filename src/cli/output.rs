//! Output formatting helpers for CLI commands

use crate::api::{ServiceEntry, ServicesResponse};
use crate::health::{OverallStatus, ServiceState, StatusSummary};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

fn state_label(state: ServiceState) -> String {
    match state {
        ServiceState::Online => "Online".green().to_string(),
        ServiceState::Offline => "Offline".red().to_string(),
        ServiceState::Unknown => "Unknown".yellow().to_string(),
    }
}

/// Format services as a table
pub fn format_services_table(services: &[ServiceEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "URL", "Status", "Latency", "Error"]);

    for entry in services {
        let latency = entry
            .status
            .latency_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&entry.service.id),
            Cell::new(&entry.service.display_name),
            Cell::new(entry.service.health_url()),
            Cell::new(state_label(entry.status.state)),
            Cell::new(latency),
            Cell::new(entry.status.last_error.as_deref().unwrap_or("")),
        ]);
    }

    table.to_string()
}

/// One-line summary, e.g. `System Status: Degraded (7/10 online)`
pub fn format_summary(summary: &StatusSummary) -> String {
    let label = match summary.status {
        OverallStatus::Healthy => "Healthy".green(),
        OverallStatus::Degraded => "Degraded".yellow(),
        OverallStatus::Offline => "Offline".red(),
    };
    format!(
        "System Status: {} ({}/{} online)",
        label, summary.online, summary.total
    )
}

/// Format the status response as pretty JSON
pub fn format_services_json(response: &ServicesResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

/// Status icon for a service state
pub fn status_icon(state: ServiceState) -> &'static str {
    match state {
        ServiceState::Online => "✓",
        ServiceState::Offline => "✗",
        ServiceState::Unknown => "?",
    }
}
