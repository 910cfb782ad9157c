//! # Order Query Runtime
//!
//! Runs the paginated order-summary query.
//!
//! ## Core Components
//!
//! - **[`OrderQueryService`]**: normalizes parameters, fans out the list and count
//!   repository calls, joins them and assembles a [`PageResult`](order_query_core::PageResult)
//! - **[`metrics`]**: Prometheus exporter and query metrics
//!
//! ## Concurrency
//!
//! Each call is independent and holds no state beyond its own lifetime. Within a
//! call, the list and count queries run concurrently and are joined before the
//! page is assembled. Dropping the returned future (client disconnect, request
//! timeout) drops both in-flight repository futures with it.
//!
//! ## Example
//!
//! ```ignore
//! use order_query_runtime::OrderQueryService;
//! use order_query_core::{environment::SystemClock, RawOrderQuery};
//! use std::sync::Arc;
//!
//! let service = OrderQueryService::new(Arc::new(repository), Arc::new(SystemClock));
//! let page = service.get_order_summaries(&RawOrderQuery::default()).await?;
//! println!("{} of {} orders", page.content().len(), page.total_elements());
//! ```

/// Prometheus metrics for observability
pub mod metrics;

/// The order query service
pub mod service;

pub use service::OrderQueryService;
