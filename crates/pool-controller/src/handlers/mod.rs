//! HTTP request handlers for the pool controller.

pub mod health;
pub mod metrics;
pub mod selection;
pub mod servers;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use selection::select_server;
pub use servers::{list_servers, register_server, update_server};
