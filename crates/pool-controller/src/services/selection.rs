//! Server selection service.
//!
//! Picks the conferencing server a new meeting should be created on: the
//! eligible server with the lowest load score. Scores come from the load
//! poller; a server without a current score is never eligible.

use crate::errors::PoolError;
use crate::models::SelectedServer;
use crate::observability::metrics;
use crate::repositories::ServersRepository;
use sqlx::PgPool;
use tracing::instrument;

/// Service for server selection operations.
pub struct SelectionService;

impl SelectionService {
    /// Select the least-loaded server for a new meeting.
    ///
    /// # Errors
    ///
    /// - `PoolError::ServiceUnavailable` - No eligible server in the pool
    /// - `PoolError::Database` - Database operation failed
    #[instrument(skip(pool))]
    pub async fn select_server(pool: &PgPool) -> Result<SelectedServer, PoolError> {
        let candidates = ServersRepository::list_selectable(pool).await?;

        let Some(selected) = least_loaded(&candidates) else {
            tracing::warn!(
                target: "pool.service.selection",
                "No eligible servers available for selection"
            );
            metrics::record_selection("empty_pool");
            return Err(PoolError::ServiceUnavailable(
                "No conferencing servers available".to_string(),
            ));
        };

        tracing::debug!(
            target: "pool.service.selection",
            server_id = %selected.server_id,
            load = selected.load,
            candidate_count = candidates.len(),
            "Selected least-loaded server"
        );
        metrics::record_selection("selected");

        Ok(selected.clone())
    }
}

/// Pick the candidate with the lowest load score.
///
/// Ties are broken by server ID so repeated calls with an unchanged pool
/// return the same server.
fn least_loaded(candidates: &[SelectedServer]) -> Option<&SelectedServer> {
    candidates
        .iter()
        .min_by_key(|c| (c.load, c.server_id.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::types::ServerId;
    use uuid::Uuid;

    fn candidate(load: i64, uuid_byte: u8) -> SelectedServer {
        SelectedServer {
            server_id: ServerId(Uuid::from_bytes([uuid_byte; 16])),
            base_url: format!("https://conf-{uuid_byte}.example.org"),
            load,
        }
    }

    #[test]
    fn test_least_loaded_empty() {
        assert!(least_loaded(&[]).is_none());
    }

    #[test]
    fn test_least_loaded_single() {
        let candidates = vec![candidate(42, 1)];
        let selected = least_loaded(&candidates).unwrap();
        assert_eq!(selected.load, 42);
    }

    #[test]
    fn test_least_loaded_picks_minimum() {
        let candidates = vec![candidate(30, 1), candidate(5, 2), candidate(17, 3)];
        let selected = least_loaded(&candidates).unwrap();
        assert_eq!(selected.load, 5);
    }

    #[test]
    fn test_least_loaded_accepts_negative_scores() {
        // The media-weight policy can produce negative scores on
        // inconsistent upstream counts; selection just compares them.
        let candidates = vec![candidate(3, 1), candidate(-2, 2)];
        let selected = least_loaded(&candidates).unwrap();
        assert_eq!(selected.load, -2);
    }

    #[test]
    fn test_least_loaded_tie_breaks_by_server_id() {
        let candidates = vec![candidate(10, 9), candidate(10, 1), candidate(10, 5)];
        let selected = least_loaded(&candidates).unwrap();
        assert_eq!(selected.server_id, ServerId(Uuid::from_bytes([1; 16])));
    }

    #[test]
    fn test_least_loaded_is_deterministic() {
        let candidates = vec![candidate(10, 9), candidate(10, 1), candidate(4, 5)];
        let first = least_loaded(&candidates).unwrap().server_id;
        let second = least_loaded(&candidates).unwrap().server_id;
        assert_eq!(first, second);
    }
}
