//! # HTTP API
//!
//! The chat relay endpoint plus read-only views of the poller's status table.
//!
//! ## Endpoints
//!
//! - `GET /` - Service index
//! - `GET /health` - Liveness of this process
//! - `GET /metrics` - JSON process diagnostics
//! - `GET /metrics/prometheus` - Prometheus text exposition
//! - `POST /ask` - Relay a prompt to the generation backend (rate limited)
//! - `GET /v1/services` - All services with their latest status
//! - `GET /v1/services/{id}` - One service
//! - `POST /v1/services/{id}/test` - Deep probe of one service
//! - `POST /v1/services/refresh` - Run a poll cycle now
//! - `GET /ws` - WebSocket stream of status snapshots
//!
//! ## Example
//!
//! ```no_run
//! use sogum::api::{create_router, AppState};
//! use sogum::config::SogumConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = Arc::new(AppState::new(Arc::new(SogumConfig::default()))?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Errors are returned as:
//! ```json
//! {
//!   "error": "Generation backend is unavailable",
//!   "code": "backend_unavailable",
//!   "requestId": "5f0c6c1e-3b7a-4e42-9d7e-0a9f1c2b3d4e"
//! }
//! ```

mod ask;
mod error;
mod health;
pub mod rate_limit;
mod services;
mod ws;

pub use ask::AskRequest;
pub use error::ApiError;
pub use health::{HealthResponse, RootResponse};
pub use rate_limit::RateLimiter;
pub use services::{ServiceEntry, ServicesResponse, TestResponse};

use crate::config::SogumConfig;
use crate::health::{Poller, StatusUpdate};
use crate::metrics::MetricsCollector;
use crate::registry::ServiceRegistry;
use crate::relay::ChatRelay;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1 MiB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Buffered status snapshots per WebSocket subscriber.
const WS_CHANNEL_CAPACITY: usize = 64;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub config: Arc<SogumConfig>,
    pub poller: Arc<Poller>,
    pub relay: Arc<ChatRelay>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub metrics_collector: Arc<MetricsCollector>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Status snapshots for WebSocket subscribers
    pub ws_broadcast: broadcast::Sender<StatusUpdate>,
}

impl AppState {
    /// Build the registry, poller and relay described by `config`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid service list or if the HTTP client can't be built.
    pub fn new(config: Arc<SogumConfig>) -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Arc::new(ServiceRegistry::from_configs(
            &config.services,
            &config.health_check.host,
        )?);

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()?;

        let (ws_broadcast, _) = broadcast::channel(WS_CHANNEL_CAPACITY);
        let poller = Poller::with_client(
            Arc::clone(&registry),
            config.health_check.clone(),
            client.clone(),
        )
        .with_broadcast(ws_broadcast.clone());

        let relay = ChatRelay::ollama(config.relay.clone(), client)
            .with_content_logging(config.logging.enable_content_logging);

        Ok(Self::from_parts(
            config,
            Arc::new(poller),
            Arc::new(relay),
            ws_broadcast,
        ))
    }

    /// Assemble state from prebuilt components.
    ///
    /// `ws_broadcast` should be the sender the poller was given, or WebSocket
    /// clients only ever see the initial snapshot.
    pub fn from_parts(
        config: Arc<SogumConfig>,
        poller: Arc<Poller>,
        relay: Arc<ChatRelay>,
        ws_broadcast: broadcast::Sender<StatusUpdate>,
    ) -> Self {
        let start_time = Instant::now();
        let metrics_collector = Arc::new(MetricsCollector::new(
            poller.table(),
            start_time,
            crate::metrics::metrics_handle(),
        ));
        let rate_limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));

        Self {
            registry: Arc::clone(poller.registry()),
            config,
            poller,
            relay,
            start_time,
            metrics_collector,
            rate_limiter,
            ws_broadcast,
        }
    }
}

/// CORS for the configured origins; an empty list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut ask = Router::new().route("/ask", post(ask::handle));
    if state.config.rate_limit.enabled {
        ask = ask.route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit::enforce,
        ));
    }

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .route(
            "/metrics/prometheus",
            get(crate::metrics::handler::prometheus_handler),
        )
        .route("/v1/services", get(services::list))
        .route("/v1/services/refresh", post(services::refresh))
        .route("/v1/services/:id", get(services::get))
        .route("/v1/services/:id/test", post(services::test))
        .route("/ws", get(ws::handle))
        .merge(ask)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(cors_layer(&state.config.server.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
