//! In-memory repository testing utilities
//!
//! Provides a fast, deterministic stand-in for the order-summary store:
//! - [`InMemoryOrderSummaryRepository`]: Vec-backed repository with call counters
//! - [`sample_order`] / [`sample_orders`]: builders for test data

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use chrono::{DateTime, TimeDelta, Utc};
use order_query_core::{
    Decimal, OrderFilter, OrderSummary, OrderSummaryRepository, RepositoryError, RepositoryFuture,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Per-operation behaviour knobs.
#[derive(Debug, Default)]
struct Behaviour {
    find_failure: Option<String>,
    count_failure: Option<String>,
    find_delay: Option<Duration>,
    count_delay: Option<Duration>,
    count_override: Option<u64>,
}

/// In-memory order-summary repository for fast, deterministic testing.
///
/// Filters by status and order date, orders by `order_date` descending
/// (ties broken by `order_id` descending) and slices `LIMIT size OFFSET page*size`,
/// mirroring the Postgres adapter.
///
/// Every call is counted when it is issued and again when it completes, so
/// tests can assert that no I/O happened, or that a call was abandoned.
///
/// Clones share state.
///
/// # Example
///
/// ```
/// use order_query_testing::{sample_orders, test_clock, InMemoryOrderSummaryRepository};
/// use order_query_core::{environment::Clock, OrderFilter, OrderSummaryRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let now = test_clock().now();
/// let repository = InMemoryOrderSummaryRepository::with_orders(sample_orders(5, "DELIVERED", now));
///
/// let count = repository.count_summaries(&OrderFilter::defaults(now)).await?;
/// assert_eq!(count, 5);
/// assert_eq!(repository.count_calls(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryOrderSummaryRepository {
    orders: Arc<RwLock<Vec<OrderSummary>>>,
    behaviour: Arc<RwLock<Behaviour>>,
    find_calls: Arc<AtomicUsize>,
    count_calls: Arc<AtomicUsize>,
    find_completed: Arc<AtomicUsize>,
    count_completed: Arc<AtomicUsize>,
}

impl InMemoryOrderSummaryRepository {
    /// Create a new empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-loaded with `orders`
    #[must_use]
    pub fn with_orders(orders: Vec<OrderSummary>) -> Self {
        let repository = Self::new();
        repository.insert_all(orders);
        repository
    }

    /// Add orders to the store
    pub fn insert_all(&self, orders: impl IntoIterator<Item = OrderSummary>) {
        self.orders.write().unwrap().extend(orders);
    }

    /// Number of stored orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().unwrap().is_empty()
    }

    /// Make every subsequent `find_summaries` call fail with a database error
    pub fn fail_find_with(&self, message: impl Into<String>) {
        self.behaviour.write().unwrap().find_failure = Some(message.into());
    }

    /// Make every subsequent `count_summaries` call fail with a database error
    pub fn fail_count_with(&self, message: impl Into<String>) {
        self.behaviour.write().unwrap().count_failure = Some(message.into());
    }

    /// Delay every `find_summaries` call by `delay` before it resolves
    pub fn delay_find(&self, delay: Duration) {
        self.behaviour.write().unwrap().find_delay = Some(delay);
    }

    /// Delay every `count_summaries` call by `delay` before it resolves
    pub fn delay_count(&self, delay: Duration) {
        self.behaviour.write().unwrap().count_delay = Some(delay);
    }

    /// Report `count` from `count_summaries` regardless of the stored rows.
    ///
    /// Simulates rows being inserted or deleted between the two reads.
    pub fn override_count(&self, count: u64) {
        self.behaviour.write().unwrap().count_override = Some(count);
    }

    /// Number of `find_summaries` calls issued
    #[must_use]
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `count_summaries` calls issued
    #[must_use]
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// Number of `find_summaries` calls that ran to completion
    #[must_use]
    pub fn find_completed(&self) -> usize {
        self.find_completed.load(Ordering::SeqCst)
    }

    /// Number of `count_summaries` calls that ran to completion
    #[must_use]
    pub fn count_completed(&self) -> usize {
        self.count_completed.load(Ordering::SeqCst)
    }

    /// Total calls issued across both operations
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.find_calls() + self.count_calls()
    }

    fn matching(&self, filter: &OrderFilter) -> Vec<OrderSummary> {
        let mut matching: Vec<OrderSummary> = self
            .orders
            .read()
            .unwrap()
            .iter()
            .filter(|o| o.order_status == filter.status && o.order_date >= filter.since)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.order_date
                .cmp(&a.order_date)
                .then_with(|| b.order_id.cmp(&a.order_id))
        });
        matching
    }
}

impl OrderSummaryRepository for InMemoryOrderSummaryRepository {
    fn find_summaries<'a>(&'a self, filter: &'a OrderFilter) -> RepositoryFuture<'a, Vec<OrderSummary>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            let (delay, failure) = {
                let behaviour = self.behaviour.read().unwrap();
                (behaviour.find_delay, behaviour.find_failure.clone())
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.find_completed.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = failure {
                return Err(RepositoryError::Database(message));
            }

            let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
            let size = usize::try_from(filter.size).unwrap_or(usize::MAX);
            Ok(self
                .matching(filter)
                .into_iter()
                .skip(offset)
                .take(size)
                .collect())
        })
    }

    fn count_summaries<'a>(&'a self, filter: &'a OrderFilter) -> RepositoryFuture<'a, u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            let (delay, failure, count_override) = {
                let behaviour = self.behaviour.read().unwrap();
                (
                    behaviour.count_delay,
                    behaviour.count_failure.clone(),
                    behaviour.count_override,
                )
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.count_completed.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = failure {
                return Err(RepositoryError::Database(message));
            }

            Ok(count_override
                .unwrap_or_else(|| u64::try_from(self.matching(filter).len()).unwrap_or(u64::MAX)))
        })
    }
}

/// Build one order summary with predictable field values.
#[must_use]
pub fn sample_order(order_id: i64, status: &str, order_date: DateTime<Utc>) -> OrderSummary {
    OrderSummary {
        order_id,
        customer_name: format!("customer-{order_id}"),
        product_name: format!("product-{}", order_id % 10),
        quantity: 1,
        total_amount: Decimal::new(order_id * 100 + 99, 2),
        order_status: status.to_string(),
        order_date,
    }
}

/// Build `count` orders with the given status, one hour apart, the newest at `newest`.
///
/// Order ids run from 1 (newest) to `count` (oldest).
#[must_use]
pub fn sample_orders(count: usize, status: &str, newest: DateTime<Utc>) -> Vec<OrderSummary> {
    (1..=i64::try_from(count).unwrap_or(i64::MAX))
        .map(|id| sample_order(id, status, newest - TimeDelta::hours(id - 1)))
        .collect()
}
