//! # Order Query Server
//!
//! Process-level concerns for the order-summary query service:
//!
//! - [`config`]: environment-driven configuration
//! - [`bootstrap`]: connect the pool, run migrations, install metrics and wire the service
//! - [`readiness`]: database probe behind `GET /ready`
//! - [`serve`]: bind, serve and shut down gracefully

pub mod bootstrap;
pub mod config;
pub mod readiness;
pub mod serve;

pub use bootstrap::build_state;
pub use config::Config;
pub use serve::{serve, shutdown_signal};
