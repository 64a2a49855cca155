//! HTTP routes for the pool controller.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use axum::{
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/v1/health` - Health check endpoint (database ping)
/// - `/v1/servers` - Server registry listing and registration
/// - `/v1/servers/{id}` - Operator enable/disable
/// - `/v1/servers/selection` - Least-loaded server pick
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        // Health check endpoint
        .route("/v1/health", get(handlers::health_check))
        // Server registry endpoints
        .route(
            "/v1/servers",
            get(handlers::list_servers).post(handlers::register_server),
        )
        .route("/v1/servers/:id", patch(handlers::update_server))
        // Selection endpoint for the room-provisioning layer
        .route("/v1/servers/selection", post(handlers::select_server))
        .with_state(state);

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    api_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
