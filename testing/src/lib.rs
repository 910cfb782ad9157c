//! # Order Query Testing
//!
//! Testing utilities for the order-summary query.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time
//! - [`InMemoryOrderSummaryRepository`]: call-counting repository with failure
//!   injection and artificial latency
//! - [`sample_order`] / [`sample_orders`]: test data builders
//!
//! ## Example
//!
//! ```ignore
//! use order_query_testing::{test_clock, sample_orders, InMemoryOrderSummaryRepository};
//! use order_query_runtime::OrderQueryService;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_second_page() {
//!     let clock = test_clock();
//!     let repository = InMemoryOrderSummaryRepository::with_orders(
//!         sample_orders(250, "DELIVERED", clock.now()),
//!     );
//!     let service = OrderQueryService::new(Arc::new(repository.clone()), Arc::new(clock));
//!
//!     let page = service.get_order_summaries(&raw_page(2)).await?;
//!     assert_eq!(page.total_pages(), 3);
//! }
//! ```

use chrono::{DateTime, Utc};
use order_query_core::environment::Clock;

pub mod repository_mocks;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use order_query_testing::mocks::FixedClock;
    /// use order_query_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
pub use repository_mocks::{sample_order, sample_orders, InMemoryOrderSummaryRepository};
