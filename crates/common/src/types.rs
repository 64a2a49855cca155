//! Common data types for pool controller components.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conferencing server in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerId(pub Uuid);

impl ServerId {
    /// Create a new random server ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ServerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_id_is_unique() {
        let a = ServerId::new();
        let b = ServerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_server_id_display_matches_inner_uuid() {
        let id = ServerId::new();
        assert_eq!(id.to_string(), id.0.to_string());
    }

    #[test]
    fn test_server_id_serde_round_trip() {
        let id = ServerId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: ServerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
