//! Router integration tests.
//!
//! Drives the assembled router in-process with `tower::ServiceExt::oneshot`.
//! The database pool is constructed lazily against an address nothing
//! listens on, so these tests cover routing and the degraded-database
//! behavior without external services.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use pool_controller::config::Config;
use pool_controller::routes::{self, AppState};
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_router() -> axum::Router {
    let vars = HashMap::from([
        (
            "DATABASE_URL".to_string(),
            "postgresql://localhost:9/pool_test".to_string(),
        ),
        ("POOL_ID".to_string(), "pool-test-001".to_string()),
    ]);
    let config = Config::from_vars(&vars).unwrap();

    // Lazy pool: no connection is attempted until a query runs, and the
    // short acquire timeout keeps the failure path fast.
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy(&config.database_url)
        .unwrap();

    let state = Arc::new(AppState { pool, config });

    // Build a recorder without installing it globally so parallel tests
    // don't race on the global recorder slot.
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

    routes::build_routes(state, metrics_handle)
}

#[tokio::test]
async fn test_health_reports_unhealthy_database() -> Result<(), anyhow::Error> {
    let app = test_router();

    let response = app
        .oneshot(Request::get("/v1/health").body(Body::empty())?)
        .await?;

    // K8s probes must always get a response, even with the database down.
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await?.to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["pool_id"], "pool-test-001");
    assert_eq!(body["database"], "unhealthy");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_renders() -> Result<(), anyhow::Error> {
    let app = test_router();

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_selection_returns_error_when_database_is_down() -> Result<(), anyhow::Error> {
    let app = test_router();

    let response = app
        .oneshot(Request::post("/v1/servers/selection").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await?.to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_invalid_body_before_touching_database(
) -> Result<(), anyhow::Error> {
    let app = test_router();

    let response = app
        .oneshot(
            Request::post("/v1/servers")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"base_url": "ftp://conf-1.example.org", "api_secret": "s"}"#,
                ))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await?.to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_404() -> Result<(), anyhow::Error> {
    let app = test_router();

    let response = app
        .oneshot(Request::get("/v1/does-not-exist").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_selection_rejects_get_method() -> Result<(), anyhow::Error> {
    let app = test_router();

    let response = app
        .oneshot(Request::get("/v1/servers/selection").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
