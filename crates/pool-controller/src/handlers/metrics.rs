//! Prometheus metrics handler.
//!
//! Serves the metrics collected by the recorder installed at startup.

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Renders the current metrics in Prometheus exposition format.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
