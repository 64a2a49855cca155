//! Pool controller configuration.
//!
//! Configuration is loaded from environment variables. All sensitive
//! fields are redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default ramp-up window in minutes for the ramp-up load strategy.
pub const DEFAULT_NEW_MEETING_WINDOW_MINUTES: i64 = 5;

/// Default minimum assumed user count for meetings inside the ramp-up window.
pub const DEFAULT_NEW_MEETING_MIN_USER_COUNT: i64 = 15;

/// Default interval between server load polls in seconds.
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 30;

/// Default pool controller instance ID prefix.
pub const DEFAULT_POOL_ID_PREFIX: &str = "pool";

/// Load estimation strategy selected via `LOAD_STRATEGY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Headcount with a floor for meetings still filling up (default).
    RampUp,

    /// Stream-cost weighting of video, audio and silent participants.
    MediaWeight,
}

impl LoadStrategy {
    /// Parse the environment variable representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ramp_up" => Some(LoadStrategy::RampUp),
            "media_weight" => Some(LoadStrategy::MediaWeight),
            _ => None,
        }
    }
}

/// Pool controller configuration.
///
/// Loaded from environment variables with sensible defaults.
/// Database URL is redacted in Debug output to prevent credential leakage.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Unique identifier for this pool controller instance.
    pub pool_id: String,

    /// Load estimation strategy (default: ramp-up).
    pub load_strategy: LoadStrategy,

    /// Ramp-up window in minutes (ramp-up strategy only).
    pub new_meeting_window_minutes: i64,

    /// Minimum assumed user count inside the ramp-up window (ramp-up
    /// strategy only).
    pub new_meeting_min_user_count: i64,

    /// Interval between server load polls in seconds.
    pub poll_interval_seconds: u64,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("pool_id", &self.pool_id)
            .field("load_strategy", &self.load_strategy)
            .field(
                "new_meeting_window_minutes",
                &self.new_meeting_window_minutes,
            )
            .field(
                "new_meeting_min_user_count",
                &self.new_meeting_min_user_count,
            )
            .field("poll_interval_seconds", &self.poll_interval_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid load strategy configuration: {0}")]
    InvalidLoadStrategy(String),

    #[error("Invalid ramp-up window configuration: {0}")]
    InvalidWindow(String),

    #[error("Invalid minimum user count configuration: {0}")]
    InvalidMinUserCount(String),

    #[error("Invalid poll interval configuration: {0}")]
    InvalidPollInterval(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse load strategy
        let load_strategy = if let Some(value) = vars.get("LOAD_STRATEGY") {
            LoadStrategy::parse(value).ok_or_else(|| {
                ConfigError::InvalidLoadStrategy(format!(
                    "LOAD_STRATEGY must be 'ramp_up' or 'media_weight', got '{}'",
                    value
                ))
            })?
        } else {
            LoadStrategy::RampUp
        };

        // Parse ramp-up window with validation
        let new_meeting_window_minutes =
            if let Some(value_str) = vars.get("NEW_MEETING_WINDOW_MINUTES") {
                let value: i64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidWindow(format!(
                        "NEW_MEETING_WINDOW_MINUTES must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value <= 0 {
                    return Err(ConfigError::InvalidWindow(format!(
                        "NEW_MEETING_WINDOW_MINUTES must be positive, got {}",
                        value
                    )));
                }

                value
            } else {
                DEFAULT_NEW_MEETING_WINDOW_MINUTES
            };

        // Parse minimum user count with validation
        let new_meeting_min_user_count =
            if let Some(value_str) = vars.get("NEW_MEETING_MIN_USER_COUNT") {
                let value: i64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidMinUserCount(format!(
                        "NEW_MEETING_MIN_USER_COUNT must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value <= 0 {
                    return Err(ConfigError::InvalidMinUserCount(format!(
                        "NEW_MEETING_MIN_USER_COUNT must be positive, got {}",
                        value
                    )));
                }

                value
            } else {
                DEFAULT_NEW_MEETING_MIN_USER_COUNT
            };

        // Parse poll interval with validation
        let poll_interval_seconds = if let Some(value_str) = vars.get("POLL_INTERVAL_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidPollInterval(format!(
                    "POLL_INTERVAL_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidPollInterval(
                    "POLL_INTERVAL_SECONDS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_POLL_INTERVAL_SECONDS
        };

        // Generate pool controller instance ID
        let pool_id = vars.get("POOL_ID").cloned().unwrap_or_else(|| {
            // Generate a unique ID based on hostname and UUID suffix
            let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
            let uuid_suffix = uuid::Uuid::new_v4().to_string();
            let short_suffix = uuid_suffix.get(..8).unwrap_or("00000000");
            format!("{}-{}-{}", DEFAULT_POOL_ID_PREFIX, hostname, short_suffix)
        });

        Ok(Config {
            database_url,
            bind_address,
            pool_id,
            load_strategy,
            new_meeting_window_minutes,
            new_meeting_min_user_count,
            poll_interval_seconds,
        })
    }
}
