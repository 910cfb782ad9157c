//! Orchestration of one paginated order-summary query.

use crate::metrics::QueryMetrics;
use order_query_core::environment::Clock;
use order_query_core::{
    OrderFilter, OrderSummary, OrderSummaryRepository, PageResult, QueryError, RawOrderQuery,
};
use std::sync::Arc;
use std::time::Instant;

/// Paginated order-summary query over an injected repository.
///
/// Wiring is explicit: construct it once at startup with a concrete
/// [`OrderSummaryRepository`] and a [`Clock`], then share it (it is cheap to clone).
#[derive(Clone)]
pub struct OrderQueryService {
    repository: Arc<dyn OrderSummaryRepository>,
    clock: Arc<dyn Clock>,
}

impl OrderQueryService {
    /// Create a new service.
    #[must_use]
    pub fn new(repository: Arc<dyn OrderSummaryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Run the query for raw request parameters.
    ///
    /// 1. Normalize parameters against the current time
    /// 2. Issue `find_summaries` and `count_summaries` concurrently, wait for both
    /// 3. Derive `total_pages` and assemble the page
    ///
    /// Parameter validation happens before any repository call.
    ///
    /// # Errors
    ///
    /// - [`QueryError::InvalidParameter`] if a parameter is malformed (no repository call is made)
    /// - [`QueryError::DataAccess`] if either repository call fails (the other result is discarded)
    /// - [`QueryError::InvalidArgument`] if the page cannot be assembled
    #[tracing::instrument(skip(self, raw), name = "get_order_summaries")]
    pub async fn get_order_summaries(
        &self,
        raw: &RawOrderQuery,
    ) -> Result<PageResult<OrderSummary>, QueryError> {
        let start = Instant::now();

        let result = match OrderFilter::normalize(raw, self.clock.now()) {
            Ok(filter) => self.query(&filter).await,
            Err(error) => {
                tracing::debug!(%error, "Rejected order query parameters");
                Err(error)
            }
        };

        QueryMetrics::record(&result, start.elapsed());
        result
    }

    /// Run the query for an already-normalized filter.
    ///
    /// # Errors
    ///
    /// - [`QueryError::DataAccess`] if either repository call fails
    /// - [`QueryError::InvalidArgument`] if the page cannot be assembled
    pub async fn query(&self, filter: &OrderFilter) -> Result<PageResult<OrderSummary>, QueryError> {
        tracing::debug!(
            status = %filter.status,
            since = %filter.since,
            page = filter.page,
            size = filter.size,
            "Querying order summaries"
        );

        // Fail fast: the first error drops the other in-flight call.
        let (content, counted) = tokio::try_join!(
            self.repository.find_summaries(filter),
            self.repository.count_summaries(filter),
        )
        .map_err(|error| {
            tracing::error!(%error, status = %filter.status, "Order summary repository call failed");
            QueryError::from(error)
        })?;

        let page = assemble(filter, content, counted)?;

        tracing::debug!(
            returned = page.content().len(),
            total_elements = page.total_elements(),
            total_pages = page.total_pages(),
            "Order summaries loaded"
        );
        Ok(page)
    }
}

/// Build the page from the two independent reads.
///
/// The list and count are not read in one transaction, so they can disagree.
/// The page never holds more than `size` items, and a non-empty page is never
/// reported with fewer total elements than it proves exist.
fn assemble(
    filter: &OrderFilter,
    mut content: Vec<OrderSummary>,
    counted: u64,
) -> Result<PageResult<OrderSummary>, QueryError> {
    let size = usize::try_from(filter.size).unwrap_or(usize::MAX);
    if content.len() > size {
        tracing::warn!(
            returned = content.len(),
            size = filter.size,
            "Repository returned more rows than requested, truncating"
        );
        content.truncate(size);
    }

    let mut total_elements = counted;
    if !content.is_empty() {
        let seen = filter
            .offset()
            .saturating_add(u64::try_from(content.len()).unwrap_or(u64::MAX));
        if seen > counted {
            tracing::debug!(counted, seen, "Count lagged behind list, raising total");
            total_elements = seen;
        }
    }

    PageResult::new(content, filter.page, filter.size, total_elements)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use order_query_core::{DateTime, Decimal, Utc};

    fn order(id: i64) -> OrderSummary {
        OrderSummary {
            order_id: id,
            customer_name: "c".to_string(),
            product_name: "p".to_string(),
            quantity: 1,
            total_amount: Decimal::ONE,
            order_status: "DELIVERED".to_string(),
            order_date: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn filter(page: u32, size: u32) -> OrderFilter {
        OrderFilter {
            page,
            size,
            ..OrderFilter::defaults(DateTime::<Utc>::UNIX_EPOCH)
        }
    }

    #[test]
    fn test_assemble_passes_consistent_reads_through() {
        let page = assemble(&filter(1, 2), vec![order(3), order(4)], 5).unwrap();
        assert_eq!(page.content().len(), 2);
        assert_eq!(page.total_elements(), 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_assemble_truncates_oversized_page() {
        let page = assemble(&filter(0, 2), vec![order(1), order(2), order(3)], 3).unwrap();
        let ids: Vec<i64> = page.content().iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_assemble_raises_lagging_count() {
        let page = assemble(&filter(2, 10), vec![order(21)], 0).unwrap();
        assert_eq!(page.total_elements(), 21);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_assemble_keeps_count_for_page_past_the_end() {
        let page = assemble(&filter(9, 10), vec![], 25).unwrap();
        assert!(page.content().is_empty());
        assert_eq!(page.total_elements(), 25);
        assert_eq!(page.total_pages(), 3);
    }
}
