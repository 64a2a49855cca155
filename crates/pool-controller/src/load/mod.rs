//! Server load estimation.
//!
//! Reduces the list of meetings currently running on one conferencing server
//! to a single scalar score. Scores are comparable across servers; the
//! selection service picks the server with the lowest one when placing a new
//! meeting.
//!
//! Two interchangeable policies exist, selected via [`LoadStrategy`] in the
//! service configuration:
//!
//! - [`RampUpCalculator`] - headcount based, with a floor for meetings that
//!   are still filling up with participants
//! - [`MediaWeightCalculator`] - weights audio and video streams higher than
//!   silent participants
//!
//! Calculators are pure: no I/O, no shared state, same input always yields
//! the same score. The current time is an explicit parameter so callers (and
//! tests) control it.

mod media_weight;
mod ramp_up;

pub use media_weight::MediaWeightCalculator;
pub use ramp_up::RampUpCalculator;

use crate::config::{Config, LoadStrategy};
use crate::models::MeetingSnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Scores the meetings running on one candidate server.
///
/// Implementations must tolerate inconsistent upstream counts (negative
/// values, more voice participants than participants) by propagating the
/// arithmetic consequences rather than rejecting the input. An empty meeting
/// list always scores `0`.
pub trait LoadCalculator: Send + Sync {
    /// Compute the load score for a server running `meetings`.
    ///
    /// `now` is the reference instant for any age-based weighting; policies
    /// that do not weight by age ignore it.
    fn load(&self, meetings: &[MeetingSnapshot], now: DateTime<Utc>) -> i64;
}

/// Build the calculator selected by the service configuration.
pub fn calculator_from_config(config: &Config) -> Arc<dyn LoadCalculator> {
    match config.load_strategy {
        LoadStrategy::RampUp => Arc::new(RampUpCalculator::new(
            config.new_meeting_window_minutes,
            config.new_meeting_min_user_count,
        )),
        LoadStrategy::MediaWeight => Arc::new(MediaWeightCalculator),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with_strategy(strategy: &str) -> Config {
        let vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://localhost/pool_test".to_string(),
            ),
            ("LOAD_STRATEGY".to_string(), strategy.to_string()),
        ]);
        Config::from_vars(&vars).expect("Config should load successfully")
    }

    #[test]
    fn test_calculator_from_config_ramp_up() {
        let config = config_with_strategy("ramp_up");
        let calculator = calculator_from_config(&config);

        // Empty input scores zero regardless of policy
        assert_eq!(calculator.load(&[], Utc::now()), 0);
    }

    #[test]
    fn test_calculator_from_config_media_weight() {
        let config = config_with_strategy("media_weight");
        let calculator = calculator_from_config(&config);

        assert_eq!(calculator.load(&[], Utc::now()), 0);
    }
}
