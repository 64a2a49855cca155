//! Ramp-up load policy.
//!
//! Scores a server by summing meeting headcounts, with one adjustment: a
//! meeting younger than the configured window is assumed to still be filling
//! with participants and is counted as at least the configured minimum user
//! count. Without the floor, a server with several just-started meetings
//! looks nearly idle and attracts every new meeting at once.
//!
//! Breakout rooms are excluded entirely. Their participants are already
//! counted in the parent meeting on the same server.

use super::LoadCalculator;
use crate::models::MeetingSnapshot;
use chrono::{DateTime, Utc};

/// Headcount-based calculator with a ramp-up floor for young meetings.
#[derive(Debug, Clone)]
pub struct RampUpCalculator {
    /// Age in minutes below which a meeting is considered still ramping up.
    window_minutes: i64,

    /// Minimum participant count assumed for a ramping-up meeting.
    min_user_count: i64,
}

impl RampUpCalculator {
    /// Create a calculator with the given ramp-up window and floor.
    ///
    /// Both values come from configuration and are not validated here.
    #[must_use]
    pub fn new(window_minutes: i64, min_user_count: i64) -> Self {
        Self {
            window_minutes,
            min_user_count,
        }
    }
}

impl LoadCalculator for RampUpCalculator {
    fn load(&self, meetings: &[MeetingSnapshot], now: DateTime<Utc>) -> i64 {
        meetings
            .iter()
            .filter(|m| !m.is_breakout)
            .map(|m| {
                let age_minutes = (now - m.created_at).num_minutes();
                if age_minutes < self.window_minutes {
                    m.participant_count.max(self.min_user_count)
                } else {
                    m.participant_count
                }
            })
            .sum()
    }
}
