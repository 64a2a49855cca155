//! Server selection handler.
//!
//! Implements the endpoint the room-provisioning layer calls when it needs a
//! backend for a new meeting:
//!
//! - `POST /v1/servers/selection` - Pick the least-loaded eligible server

use crate::errors::PoolError;
use crate::models::SelectionResponse;
use crate::routes::AppState;
use crate::services::SelectionService;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /v1/servers/selection
///
/// Returns the enabled online server with the lowest load score.
///
/// # Response
///
/// - 200 OK: Selected server returned
/// - 503 Service Unavailable: No eligible server in the pool
#[instrument(skip(state))]
pub async fn select_server(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SelectionResponse>, PoolError> {
    let selected = SelectionService::select_server(&state.pool).await?;
    Ok(Json(SelectionResponse::from(selected)))
}
