//! Server pool admin handlers.
//!
//! Implements the server registry endpoints:
//!
//! - `GET /v1/servers` - List registered servers with health and load
//! - `POST /v1/servers` - Register a new server
//! - `PATCH /v1/servers/{id}` - Enable or disable a server
//!
//! # Security
//!
//! - API secrets are accepted on registration but never returned
//! - Error messages are generic to prevent information leakage

use crate::errors::PoolError;
use crate::models::{RegisterServerRequest, ServerResponse, UpdateServerRequest};
use crate::repositories::ServersRepository;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::ServerId;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Handler for GET /v1/servers
///
/// List all registered servers with their operator flag, poller-reported
/// health and last computed load score.
#[instrument(skip(state))]
pub async fn list_servers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServerResponse>>, PoolError> {
    let rows = ServersRepository::list_all(&state.pool).await?;
    Ok(Json(rows.into_iter().map(ServerResponse::from).collect()))
}

/// Handler for POST /v1/servers
///
/// Register a conferencing server in the pool. The server starts out
/// offline; the load poller promotes it once it answers a meetings poll.
///
/// # Response
///
/// - 201 Created: Server registered
/// - 400 Bad Request: Invalid request body
/// - 409 Conflict: A server with this base URL already exists
#[instrument(skip(state, request))]
pub async fn register_server(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterServerRequest>,
) -> Result<(StatusCode, Json<ServerResponse>), PoolError> {
    request
        .validate()
        .map_err(PoolError::BadRequest)?;

    let base_url = request.base_url.trim();
    let row = ServersRepository::insert(&state.pool, base_url, &request.api_secret).await?;

    info!(
        target: "pool.handlers.servers",
        server_id = %row.server_id,
        base_url = %row.base_url,
        "Server registered"
    );

    Ok((StatusCode::CREATED, Json(ServerResponse::from(row))))
}

/// Handler for PATCH /v1/servers/{id}
///
/// Set the operator flag of a server. Disabled servers are neither polled
/// nor eligible for selection.
///
/// # Response
///
/// - 200 OK: Updated server returned
/// - 404 Not Found: Unknown server ID
#[instrument(skip(state, request), fields(server_id = %id))]
pub async fn update_server(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateServerRequest>,
) -> Result<Json<ServerResponse>, PoolError> {
    let row = ServersRepository::set_enabled(&state.pool, ServerId(id), request.enabled)
        .await?
        .ok_or_else(|| PoolError::NotFound("Server not found".to_string()))?;

    info!(
        target: "pool.handlers.servers",
        server_id = %row.server_id,
        enabled = row.enabled,
        "Server updated"
    );

    Ok(Json(ServerResponse::from(row)))
}
