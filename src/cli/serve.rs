//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::SogumConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<SogumConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        SogumConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        SogumConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides win
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_health_check {
        config.health_check.enabled = false;
    }

    Ok(config)
}

/// Build application state and the router that serves it
pub fn build_app(
    config: Arc<SogumConfig>,
) -> Result<(axum::Router, Arc<AppState>), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState::new(config)?);
    let router = create_router(Arc::clone(&app_state));
    Ok((router, app_state))
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    crate::logging::init_tracing(&config.logging)?;

    tracing::info!("Starting SOGUM dashboard core");
    tracing::debug!(?config, "Loaded configuration");

    let config = Arc::new(config);
    let (app, app_state) = build_app(Arc::clone(&config))?;

    for service in app_state.registry.all() {
        tracing::info!(
            service_id = %service.id,
            url = %service.health_url(),
            probe = ?service.probe,
            "Registered service"
        );
    }

    let cancel_token = CancellationToken::new();
    let poller_handle = if config.health_check.enabled {
        Some(Arc::clone(&app_state.poller).start(cancel_token.clone()))
    } else {
        tracing::info!("Health checking disabled");
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        backend = %config.relay.backend_host,
        model = %config.relay.model,
        "SOGUM API server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
    .await?;

    if let Some(handle) = poller_handle {
        tracing::info!("Waiting for health poller to stop");
        cancel_token.cancel();
        handle.await?;
    }

    tracing::info!("SOGUM server stopped");
    Ok(())
}
