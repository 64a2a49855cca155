//! Observability support for the pool controller.

pub mod metrics;
