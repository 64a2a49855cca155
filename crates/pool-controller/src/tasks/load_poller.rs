//! Load poller background task.
//!
//! Periodically polls every enabled pool server for its running meetings,
//! scores them with the configured load calculator, and records the result
//! in the server registry. A server that fails its poll is marked offline
//! and drops out of selection until it answers again.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the token
//! is cancelled, the task completes its current iteration and exits cleanly.

use crate::load::LoadCalculator;
use crate::observability::metrics;
use crate::repositories::ServersRepository;
use crate::services::MeetingsApi;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Start the load poller background task.
///
/// This task runs in a loop, polling all enabled servers every
/// `poll_interval_seconds`. It will exit gracefully when the cancellation
/// token is triggered.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `client` - Meetings API client for querying pool servers
/// * `calculator` - Load calculator selected by configuration
/// * `poll_interval_seconds` - Seconds between poll rounds
/// * `cancel_token` - Token for graceful shutdown
///
/// # Returns
///
/// Returns when the cancellation token is triggered.
#[instrument(skip_all, name = "pool.task.load_poller")]
pub async fn start_load_poller(
    pool: PgPool,
    client: Arc<dyn MeetingsApi>,
    calculator: Arc<dyn LoadCalculator>,
    poll_interval_seconds: u64,
    cancel_token: CancellationToken,
) {
    info!(
        target: "pool.task.load_poller",
        poll_interval = poll_interval_seconds,
        "Starting load poller task"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(poll_interval_seconds));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                poll_all(&pool, client.as_ref(), calculator.as_ref()).await;
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "pool.task.load_poller",
                    "Load poller task received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(
        target: "pool.task.load_poller",
        "Load poller task stopped"
    );
}

/// Run one poll round over all enabled servers.
///
/// Errors are logged and never propagate; the database or an individual
/// server might recover before the next round.
async fn poll_all(pool: &PgPool, client: &dyn MeetingsApi, calculator: &dyn LoadCalculator) {
    let targets = match ServersRepository::list_enabled(pool).await {
        Ok(targets) => targets,
        Err(e) => {
            tracing::error!(
                target: "pool.task.load_poller",
                error = %e,
                "Failed to list enabled servers"
            );
            return;
        }
    };

    for target in targets {
        let started = Instant::now();

        match client.running_meetings(&target).await {
            Ok(meetings) => {
                let load = calculator.load(&meetings, Utc::now());

                if let Err(e) =
                    ServersRepository::record_poll_success(pool, target.server_id, load).await
                {
                    tracing::error!(
                        target: "pool.task.load_poller",
                        server_id = %target.server_id,
                        error = %e,
                        "Failed to record poll success"
                    );
                } else {
                    tracing::debug!(
                        target: "pool.task.load_poller",
                        server_id = %target.server_id,
                        meeting_count = meetings.len(),
                        load,
                        "Server polled"
                    );
                    metrics::record_poll_outcome("success");
                    metrics::record_server_load(&target.server_id.to_string(), load);
                }
            }
            Err(e) => {
                warn!(
                    target: "pool.task.load_poller",
                    server_id = %target.server_id,
                    error = %e,
                    "Server poll failed, marking offline"
                );
                metrics::record_poll_outcome("failure");

                if let Err(e) =
                    ServersRepository::record_poll_failure(pool, target.server_id).await
                {
                    tracing::error!(
                        target: "pool.task.load_poller",
                        server_id = %target.server_id,
                        error = %e,
                        "Failed to record poll failure"
                    );
                }
            }
        }

        metrics::record_poll_duration(started.elapsed());
    }
}
