//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for all sensitive values, in particular the shared API secrets of the
//! conferencing servers in the pool.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that
//! derives `Debug` while holding a secret gets safe logging behavior for
//! free. Reading the actual value requires an explicit `expose_secret()`
//! call, and secrets are zeroized when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct ServerCredentials {
//!     base_url: String,
//!     api_secret: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let creds = ServerCredentials {
//!     base_url: "https://conf-1.example.org".to_string(),
//!     api_secret: SecretString::from("hunter2"),
//! };
//!
//! // Safe: api_secret is redacted
//! println!("{:?}", creds);
//!
//! // Explicit access is required to sign API requests
//! let secret: &str = creds.api_secret.expose_secret();
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hunter2");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("shared-api-secret");
        assert_eq!(secret.expose_secret(), "shared-api-secret");
    }

    #[test]
    fn test_struct_with_secret_is_safe() {
        #[allow(dead_code)]
        #[derive(Debug)]
        struct ServerCredentials {
            base_url: String,
            api_secret: SecretString,
        }

        let creds = ServerCredentials {
            base_url: "https://conf-1.example.org".to_string(),
            api_secret: SecretString::from("super-secret"),
        };

        let debug_str = format!("{creds:?}");

        // Base URL should be visible
        assert!(debug_str.contains("conf-1.example.org"));
        // Secret should be redacted
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super-secret"));
    }

    #[test]
    fn test_deserialize_from_plain_string() {
        #[derive(Debug, Deserialize)]
        struct Registration {
            api_secret: SecretString,
        }

        let json = r#"{"api_secret": "from-the-wire"}"#;
        let reg: Registration = serde_json::from_str(json).unwrap();

        assert_eq!(reg.api_secret.expose_secret(), "from-the-wire");
    }
}
