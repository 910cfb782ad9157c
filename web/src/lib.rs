//! Axum HTTP surface for the order-summary query.
//!
//! A thin shell around [`OrderQueryService`](order_query_runtime::OrderQueryService):
//! it extracts raw query parameters, calls the service and maps the outcome
//! to a JSON response.
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/api/orders` | [`handlers::orders::list_orders`] |
//! | `GET` | `/health` | [`handlers::health::health_check`] |
//! | `GET` | `/ready` | [`handlers::health::readiness_check`] |
//! | `GET` | `/metrics` | [`handlers::metrics::render_metrics`] |
//!
//! # Request Flow
//!
//! 1. **Correlation ID** assigned (or taken from `X-Correlation-ID`)
//! 2. **Trace** span opened by `tower-http`
//! 3. **Timeout** armed; an expired request is dropped along with its database calls
//! 4. **Handler** runs the query and serializes the page
//!
//! # Example
//!
//! ```ignore
//! use order_query_web::{build_router, AppState};
//! use std::time::Duration;
//!
//! let app = build_router(AppState::new(service), Duration::from_secs(30));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::CorrelationId;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};
pub use router::build_router;
pub use state::{AppState, ReadinessFuture, ReadinessProbe};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
