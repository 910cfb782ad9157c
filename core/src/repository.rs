//! Repository port: the data-access capability the query depends on.
//!
//! # Implementations
//!
//! - `PostgresOrderSummaryRepository` (in `order-query-postgres`): production
//! - `InMemoryOrderSummaryRepository` (in `order-query-testing`): call-counting test double
//!
//! The two operations are independent and may run concurrently.

use crate::error::RepositoryError;
use crate::filter::OrderFilter;
use crate::order::OrderSummary;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by repository operations.
pub type RepositoryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Read access to order summaries.
///
/// Object-safe so it can be shared as `Arc<dyn OrderSummaryRepository>`.
pub trait OrderSummaryRepository: Send + Sync {
    /// Load one page of summaries matching `filter.status` with an order date at
    /// or after `filter.since`.
    ///
    /// Returns at most `filter.size` items starting at row `filter.offset()`.
    /// Ordering is a contract of the store and must be stable across pages.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store fails or a row cannot be decoded.
    fn find_summaries<'a>(&'a self, filter: &'a OrderFilter) -> RepositoryFuture<'a, Vec<OrderSummary>>;

    /// Count all summaries matching `filter.status` and `filter.since`, across all pages.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store fails.
    fn count_summaries<'a>(&'a self, filter: &'a OrderFilter) -> RepositoryFuture<'a, u64>;
}
