//! Pool controller models.
//!
//! Contains data types used across the pool controller service: the meeting
//! snapshot consumed by the load calculators, server registry types, and the
//! HTTP API request/response bodies.

use chrono::{DateTime, Utc};
use common::secret::{ExposeSecret, SecretString};
use common::types::ServerId;
use serde::{Deserialize, Serialize};

/// Maximum accepted length for a server base URL.
pub const MAX_BASE_URL_LENGTH: usize = 2048;

/// One active conferencing session observed on a pool server.
///
/// Counts are signed on purpose: servers occasionally report inconsistent
/// numbers (more open microphones than participants, negative values during
/// teardown) and the load calculators propagate those instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSnapshot {
    /// Server-assigned meeting identifier.
    pub meeting_id: String,

    /// True for a breakout room spawned from a parent meeting.
    #[serde(default)]
    pub is_breakout: bool,

    /// Total current participants.
    #[serde(default)]
    pub participant_count: i64,

    /// Participants with an open audio channel.
    #[serde(default)]
    pub voice_participant_count: i64,

    /// Participants with an active camera stream.
    #[serde(default)]
    pub video_count: i64,

    /// When the meeting started on the server.
    pub created_at: DateTime<Utc>,
}

/// Poller-reported health of a pool server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerHealth {
    /// Server answered its last meetings poll.
    Online,

    /// Server failed its last meetings poll or has never been polled.
    Offline,
}

impl ServerHealth {
    /// Returns the string representation of the health state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerHealth::Online => "online",
            ServerHealth::Offline => "offline",
        }
    }

    /// Parse the database TEXT representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "online" => Some(ServerHealth::Online),
            "offline" => Some(ServerHealth::Offline),
            _ => None,
        }
    }
}

/// Server registry row as stored in the database.
///
/// The API secret is deliberately not part of this type; only the poller
/// reads it, via [`PollTarget`].
#[derive(Debug, Clone)]
pub struct ServerRow {
    /// Unique server identifier.
    pub server_id: ServerId,

    /// Base URL of the server's API.
    pub base_url: String,

    /// Operator flag; disabled servers are never polled or selected.
    pub enabled: bool,

    /// Health as reported by the load poller.
    pub health: ServerHealth,

    /// Last computed load score (None until the first successful poll).
    pub load: Option<i64>,

    /// When the server was last polled.
    pub last_polled_at: Option<DateTime<Utc>>,

    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Polling credentials for one enabled server.
#[derive(Debug)]
pub struct PollTarget {
    /// Unique server identifier.
    pub server_id: ServerId,

    /// Base URL of the server's API.
    pub base_url: String,

    /// Shared secret for request signing (redacted in Debug).
    pub api_secret: SecretString,
}

/// Result of picking the least-loaded server for a new meeting.
#[derive(Debug, Clone)]
pub struct SelectedServer {
    /// Unique server identifier.
    pub server_id: ServerId,

    /// Base URL of the server's API.
    pub base_url: String,

    /// Load score the pick was based on.
    pub load: i64,
}

/// Health check response.
///
/// Returned by the `/v1/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Identifier of this controller instance.
    pub pool_id: String,

    /// Database connectivity status (optional, for detailed health).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Request body for registering a pool server.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterServerRequest {
    /// Base URL of the server's API.
    pub base_url: String,

    /// Shared secret for request signing (redacted in Debug).
    pub api_secret: SecretString,
}

impl RegisterServerRequest {
    /// Validate the registration request.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.base_url.trim();

        if url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if url.len() > MAX_BASE_URL_LENGTH {
            return Err(format!(
                "base_url must not exceed {MAX_BASE_URL_LENGTH} characters"
            ));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err("base_url must be an http or https URL".to_string());
        }

        if self.api_secret.expose_secret().is_empty() {
            return Err("api_secret must not be empty".to_string());
        }

        Ok(())
    }
}

/// Request body for updating a pool server.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateServerRequest {
    /// New operator flag value.
    pub enabled: bool,
}

/// Server representation returned by the admin endpoints.
///
/// Never carries the API secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerResponse {
    /// Unique server identifier.
    pub server_id: ServerId,

    /// Base URL of the server's API.
    pub base_url: String,

    /// Operator flag.
    pub enabled: bool,

    /// Health as reported by the load poller.
    pub health: ServerHealth,

    /// Last computed load score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<i64>,

    /// When the server was last polled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_polled_at: Option<DateTime<Utc>>,
}

impl From<ServerRow> for ServerResponse {
    fn from(row: ServerRow) -> Self {
        Self {
            server_id: row.server_id,
            base_url: row.base_url,
            enabled: row.enabled,
            health: row.health,
            load: row.load,
            last_polled_at: row.last_polled_at,
        }
    }
}

/// Response for a server selection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionResponse {
    /// Selected server identifier.
    pub server_id: ServerId,

    /// Base URL of the selected server's API.
    pub base_url: String,

    /// Load score the pick was based on.
    pub load: i64,
}

impl From<SelectedServer> for SelectionResponse {
    fn from(selected: SelectedServer) -> Self {
        Self {
            server_id: selected.server_id,
            base_url: selected.base_url,
            load: selected.load,
        }
    }
}
