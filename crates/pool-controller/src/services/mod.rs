//! Service layer for the pool controller.
//!
//! This module contains services that interact with external systems
//! and encapsulate business logic.
//!
//! # Components
//!
//! - `meetings_client` - HTTP client for the conferencing servers' meetings API
//! - `selection` - least-loaded server selection for new meetings

pub mod meetings_client;
pub mod selection;

pub use meetings_client::{HttpMeetingsClient, MeetingsApi};
pub use selection::SelectionService;
