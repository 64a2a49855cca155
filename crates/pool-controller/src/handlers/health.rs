//! Health check handler.
//!
//! Provides health check endpoints for liveness and readiness probes.

use crate::errors::PoolError;
use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Health check handler.
///
/// Pings the database to verify connectivity and returns the service status.
///
/// ## Response
///
/// Returns a JSON response with:
/// - `status`: "healthy" if database is reachable, "unhealthy" otherwise
/// - `pool_id`: This controller instance's identifier
/// - `database`: "healthy" if DB ping succeeds, "unhealthy" otherwise
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "pool_id": "pool-node1-3fa85f64",
///   "database": "healthy"
/// }
/// ```
#[instrument(skip_all, name = "pool.health.check")]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, PoolError> {
    // Ping database to verify connectivity
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let response = if db_healthy {
        HealthResponse {
            status: "healthy".to_string(),
            pool_id: state.config.pool_id.clone(),
            database: Some("healthy".to_string()),
        }
    } else {
        // Return unhealthy status but don't error out - K8s needs to see the response
        HealthResponse {
            status: "unhealthy".to_string(),
            pool_id: state.config.pool_id.clone(),
            database: Some("unhealthy".to_string()),
        }
    };

    Ok(Json(response))
}
