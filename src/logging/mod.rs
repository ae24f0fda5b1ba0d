//! Structured logging module for request tracing
//!
//! Filter construction, subscriber setup, correlation ids, and privacy-safe
//! field helpers.

pub mod fields;
pub mod middleware;

pub use fields::truncate_prompt;
pub use middleware::generate_request_id;

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// # Examples
///
/// ```
/// use sogum::config::LoggingConfig;
/// use sogum::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config
///     .component_levels
///     .insert("health".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,sogum::health=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    for (component, level) in &config.component_levels {
        filter_str.push_str(&format!(",sogum::{}={}", component, level));
    }

    filter_str
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured directives.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    if config.enable_content_logging {
        eprintln!("WARNING: Content logging is enabled. Prompt previews will be logged.");
        eprintln!("         This may include sensitive data. Use only for debugging.");
    }

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_filter_without_components() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "info");
    }

    #[test]
    fn test_filter_components_sorted() {
        let mut levels = BTreeMap::new();
        levels.insert("relay".to_string(), "trace".to_string());
        levels.insert("api".to_string(), "warn".to_string());
        let config = LoggingConfig {
            level: "debug".to_string(),
            component_levels: levels,
            ..Default::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "debug,sogum::api=warn,sogum::relay=trace"
        );
    }
}
