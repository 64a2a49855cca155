//! Pool controller error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse` impl.
//! Error messages returned to clients are intentionally generic to avoid
//! leaking internal details. Actual errors are logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Pool controller error type.
///
/// Maps to appropriate HTTP status codes:
/// - Database, Internal: 500 Internal Server Error
/// - NotFound: 404 Not Found
/// - Conflict: 409 Conflict
/// - BadRequest: 400 Bad Request
/// - Upstream: 502 Bad Gateway
/// - ServiceUnavailable: 503 Service Unavailable
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream server error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error")]
    Internal,
}

impl PoolError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            PoolError::Database(_) | PoolError::Internal => 500,
            PoolError::NotFound(_) => 404,
            PoolError::Conflict(_) => 409,
            PoolError::BadRequest(_) => 400,
            PoolError::Upstream(_) => 502,
            PoolError::ServiceUnavailable(_) => 503,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for PoolError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            PoolError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "pool.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            PoolError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            PoolError::Conflict(reason) => (StatusCode::CONFLICT, "CONFLICT", reason.clone()),
            PoolError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            PoolError::Upstream(reason) => {
                // Log actual reason server-side
                tracing::warn!(target: "pool.upstream", reason = %reason, "Upstream server error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "A conferencing server could not be reached".to_string(),
                )
            }
            PoolError::ServiceUnavailable(reason) => {
                // Log actual reason server-side
                tracing::warn!(target: "pool.availability", reason = %reason, "Service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            PoolError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Convert sqlx errors to PoolError
impl From<sqlx::Error> for PoolError {
    fn from(err: sqlx::Error) -> Self {
        PoolError::Database(err.to_string())
    }
}
