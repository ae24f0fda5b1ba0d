//! CLI module for SOGUM
//!
//! Command-line interface definitions and handlers for the dashboard core.
//!
//! # Commands
//!
//! - `serve` - Start the relay and health poller
//! - `status` - Check every service once and print the table
//! - `test` - Deep probe of one service
//! - `ask` / `chat` - Talk to a running relay from the terminal
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! sogum serve
//!
//! # One-shot status check as JSON
//! sogum status --json
//!
//! # Generate shell completions
//! sogum completions bash > ~/.bash_completion.d/sogum
//! ```

pub mod chat;
pub mod completions;
pub mod config;
pub mod output;
pub mod probe;
pub mod serve;
pub mod status;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::SogumConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Default relay URL for the chat client.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001";

/// SOGUM - service health dashboard and chat relay
#[derive(Parser, Debug)]
#[command(
    name = "sogum",
    version,
    about = "Service health aggregation and chat relay for the SOGUM dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the relay server and health poller
    Serve(ServeArgs),
    /// Check every service once
    Status(StatusArgs),
    /// Deep probe of one service
    Test(TestArgs),
    /// Send one prompt to a running relay
    Ask(AskArgs),
    /// Interactive chat against a running relay
    Chat(ChatArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "sogum.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "SOGUM_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "SOGUM_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SOGUM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable the background health poller
    #[arg(long)]
    pub no_health_check: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "sogum.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Service id (e.g. llm)
    pub id: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "sogum.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Prompt to send
    pub prompt: String,

    /// Relay base URL
    #[arg(long, default_value = DEFAULT_RELAY_URL, env = "SOGUM_RELAY_URL")]
    pub url: String,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Relay base URL
    #[arg(long, default_value = DEFAULT_RELAY_URL, env = "SOGUM_RELAY_URL")]
    pub url: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "sogum.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load `path` if it exists (defaults otherwise), apply environment
/// overrides and validate.
pub fn load_config(path: &Path) -> Result<SogumConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        SogumConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        SogumConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
