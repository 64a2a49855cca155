//! Metrics definitions for the pool controller.
//!
//! All metrics follow Prometheus naming conventions:
//! - `pool_` prefix for the pool controller
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `outcome`: 2-3 values per metric (success/failure, selected/empty_pool)
//! - `server`: bounded by the size of the server pool

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded. Poll durations are
/// dominated by upstream HTTP round trips, so buckets span 5ms to 10s.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("pool_poll".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set poll buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record the outcome of polling one server.
///
/// Metric: `pool_poll_total`
/// Labels: `outcome` (success | failure)
pub fn record_poll_outcome(outcome: &str) {
    counter!("pool_poll_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record how long polling one server took, including the load computation.
///
/// Metric: `pool_poll_duration_seconds`
pub fn record_poll_duration(duration: Duration) {
    histogram!("pool_poll_duration_seconds").record(duration.as_secs_f64());
}

/// Record the current load score of one server.
///
/// Metric: `pool_server_load`
/// Labels: `server` (bounded by pool size)
pub fn record_server_load(server: &str, load: i64) {
    gauge!("pool_server_load", "server" => server.to_string()).set(load as f64);
}

/// Record the outcome of a selection request.
///
/// Metric: `pool_selection_total`
/// Labels: `outcome` (selected | empty_pool)
pub fn record_selection(outcome: &str) {
    counter!("pool_selection_total", "outcome" => outcome.to_string()).increment(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        // The metrics facade drops samples when no recorder is installed;
        // helpers must not panic in that state (unit tests, early startup).
        record_poll_outcome("success");
        record_poll_duration(Duration::from_millis(25));
        record_server_load("srv-1", 42);
        record_selection("selected");
    }
}
