//! HTTP request handlers.

pub mod health;
pub mod metrics;
pub mod orders;

pub use health::{health_check, readiness_check};
pub use metrics::render_metrics;
pub use orders::list_orders;
