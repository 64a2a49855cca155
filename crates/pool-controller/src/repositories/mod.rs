//! Repository layer for the pool controller.
//!
//! Provides database access patterns following the Handler -> Service -> Repository
//! architecture. All queries use parameterized statements.

pub mod servers;

pub use servers::ServersRepository;
