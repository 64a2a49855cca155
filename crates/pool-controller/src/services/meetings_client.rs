//! Conferencing server meetings client.
//!
//! Fetches the list of running meetings from one pool server. Requests are
//! signed with the BigBlueButton-compatible checksum scheme: the SHA-1 of
//! the API call name, the query string, and the server's shared secret,
//! appended as a `checksum` query parameter.
//!
//! # Security
//!
//! - The shared secret never leaves this process; only its checksum is sent
//! - Timeouts prevent hanging connections
//! - Errors are logged server-side with generic messages returned upstream

use crate::errors::PoolError;
use crate::models::{MeetingSnapshot, PollTarget};
use common::secret::ExposeSecret;
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;
use tracing::{error, instrument, warn};

/// Default timeout for meetings requests in seconds.
const MEETINGS_REQUEST_TIMEOUT_SECS: u64 = 10;

/// API call name used in the checksum for the meetings listing.
const GET_MEETINGS_ACTION: &str = "getMeetings";

/// Response envelope of the meetings endpoint.
#[derive(Debug, Deserialize)]
struct MeetingsEnvelope {
    meetings: Vec<MeetingSnapshot>,
}

/// Client capability for fetching a server's running meetings.
///
/// The load poller depends on this trait so tests can substitute a mock.
#[async_trait::async_trait]
pub trait MeetingsApi: Send + Sync {
    /// Fetch the meetings currently running on `target`.
    async fn running_meetings(
        &self,
        target: &PollTarget,
    ) -> Result<Vec<MeetingSnapshot>, PoolError>;
}

/// HTTP implementation of [`MeetingsApi`].
#[derive(Clone)]
pub struct HttpMeetingsClient {
    /// HTTP client with configured timeouts.
    client: Client,
}

impl HttpMeetingsClient {
    /// Create a new meetings client.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Internal` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, PoolError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(MEETINGS_REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                error!(target: "pool.services.meetings_client", error = %e, "Failed to build HTTP client");
                PoolError::Internal
            })?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl MeetingsApi for HttpMeetingsClient {
    #[instrument(skip(self, target), fields(server_id = %target.server_id))]
    async fn running_meetings(
        &self,
        target: &PollTarget,
    ) -> Result<Vec<MeetingSnapshot>, PoolError> {
        let checksum = sign_checksum(
            GET_MEETINGS_ACTION,
            "",
            target.api_secret.expose_secret(),
        );
        let base = target.base_url.trim_end_matches('/');
        let url = format!("{base}/api/v1/meetings?checksum={checksum}");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(
                target: "pool.services.meetings_client",
                server_id = %target.server_id,
                error = %e,
                "Meetings request failed"
            );
            PoolError::Upstream("Conferencing server is unreachable".to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "pool.services.meetings_client",
                server_id = %target.server_id,
                status = %status,
                "Meetings request rejected"
            );
            return Err(PoolError::Upstream(format!(
                "Conferencing server returned status {status}"
            )));
        }

        let envelope: MeetingsEnvelope = response.json().await.map_err(|e| {
            warn!(
                target: "pool.services.meetings_client",
                server_id = %target.server_id,
                error = %e,
                "Meetings response could not be decoded"
            );
            PoolError::Upstream("Conferencing server returned an invalid response".to_string())
        })?;

        Ok(envelope.meetings)
    }
}

/// Compute the request checksum: `sha1(action + query + secret)` hex-encoded.
fn sign_checksum(action: &str, query: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(action.as_bytes());
    hasher.update(query.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_checksum_known_vector() {
        // sha1("getMeetings" + "" + "secret")
        assert_eq!(
            sign_checksum("getMeetings", "", "secret"),
            "867e6596b930651c0cd4dd1912bec902fae56d5a"
        );
    }

    #[test]
    fn test_sign_checksum_depends_on_secret() {
        let a = sign_checksum("getMeetings", "", "secret-a");
        let b = sign_checksum("getMeetings", "", "secret-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sign_checksum_depends_on_query() {
        let bare = sign_checksum("getMeetings", "", "secret");
        let with_query = sign_checksum("getMeetings", "meetingID=m-1", "secret");
        assert_ne!(bare, with_query);
    }

    #[test]
    fn test_meetings_envelope_decodes() {
        let json = r#"
        {
            "meetings": [
                {
                    "meeting_id": "m-1",
                    "is_breakout": false,
                    "participant_count": 10,
                    "voice_participant_count": 2,
                    "video_count": 1,
                    "created_at": "2026-08-01T12:00:00Z"
                }
            ]
        }
        "#;

        let envelope: MeetingsEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.meetings.len(), 1);
        let meeting = envelope.meetings.first().unwrap();
        assert_eq!(meeting.meeting_id, "m-1");
        assert_eq!(meeting.participant_count, 10);
    }
}
