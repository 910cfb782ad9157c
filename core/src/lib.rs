//! # Order Query Core
//!
//! Core types, ports and pure logic for the paginated order-summary query.
//!
//! This crate knows nothing about HTTP or SQL. It owns:
//!
//! - **Filter normalization**: raw query parameters → typed [`OrderFilter`]
//! - **Repository port**: the [`OrderSummaryRepository`] capability consumed from the data layer
//! - **Pagination math**: [`compute_total_pages`] and [`PageResult`]
//! - **Response shaping**: [`PagePayload`], the externally visible JSON body
//! - **Error taxonomy**: [`QueryError`] and [`RepositoryError`]
//!
//! ## Request Flow
//!
//! ```text
//! RawOrderQuery ──normalize──▶ OrderFilter ──┬──▶ find_summaries ──┐
//!                                            │                     ├──join──▶ PageResult ──▶ PagePayload
//!                                            └──▶ count_summaries ─┘
//! ```
//!
//! The orchestration itself (fan-out, fan-in, metrics) lives in the
//! `order-query-runtime` crate.
//!
//! ## Example
//!
//! ```
//! use order_query_core::{OrderFilter, RawOrderQuery, compute_total_pages};
//! use chrono::Utc;
//!
//! let raw = RawOrderQuery {
//!     page: Some("2".to_string()),
//!     ..RawOrderQuery::default()
//! };
//! let filter = OrderFilter::normalize(&raw, Utc::now()).unwrap();
//! assert_eq!(filter.status, "DELIVERED");
//! assert_eq!(filter.offset(), 200);
//!
//! assert_eq!(compute_total_pages(250, filter.size).unwrap(), 3);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use rust_decimal::Decimal;

pub mod error;
pub mod filter;
pub mod order;
pub mod page;
pub mod payload;
pub mod repository;

pub use error::{QueryError, RepositoryError};
pub use filter::{OrderFilter, RawOrderQuery};
pub use order::OrderSummary;
pub use page::{compute_total_pages, PageResult};
pub use payload::{to_payload, PagePayload};
pub use repository::{OrderSummaryRepository, RepositoryFuture};

/// Environment module - Dependency injection traits
///
/// All time-dependent logic reads the current instant through [`Clock`](environment::Clock)
/// so that tests can pin it with a fixed value.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use order_query_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = chrono::Utc::now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
