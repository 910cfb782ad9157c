//! Integration tests for the order query service
//!
//! Runs the full normalize → fan-out → join → assemble path against the
//! in-memory repository, including failure injection and cancellation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::TimeDelta;
use order_query_core::environment::Clock;
use order_query_core::{QueryError, RawOrderQuery};
use order_query_runtime::OrderQueryService;
use order_query_testing::{sample_order, sample_orders, test_clock, InMemoryOrderSummaryRepository};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Test Fixtures
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("order_query=debug")
        .try_init();
}

fn service_with(repository: &InMemoryOrderSummaryRepository) -> OrderQueryService {
    OrderQueryService::new(Arc::new(repository.clone()), Arc::new(test_clock()))
}

fn delivered(count: usize) -> InMemoryOrderSummaryRepository {
    InMemoryOrderSummaryRepository::with_orders(sample_orders(count, "DELIVERED", test_clock().now()))
}

fn query(pairs: &[(&str, &str)]) -> RawOrderQuery {
    let mut raw = RawOrderQuery::default();
    for (key, value) in pairs {
        let value = Some((*value).to_string());
        match *key {
            "status" => raw.status = value,
            "daysAgo" => raw.days_ago = value,
            "page" => raw.page = value,
            "size" => raw.size = value,
            other => panic!("unknown parameter {other}"),
        }
    }
    raw
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_defaults_return_first_page_of_delivered_orders() {
    init_tracing();
    let repository = delivered(3);
    repository.insert_all(sample_orders(2, "PENDING", test_clock().now()));
    let service = service_with(&repository);

    let page = assert_ok!(service.get_order_summaries(&RawOrderQuery::default()).await);

    assert_eq!(page.page(), 0);
    assert_eq!(page.size(), 100);
    assert_eq!(page.total_elements(), 3);
    assert_eq!(page.total_pages(), 1);
    assert!(page.content().iter().all(|o| o.order_status == "DELIVERED"));
    assert_eq!(repository.find_calls(), 1);
    assert_eq!(repository.count_calls(), 1);
}

#[tokio::test]
async fn test_last_partial_page() {
    let repository = delivered(250);
    let service = service_with(&repository);

    let page = assert_ok!(
        service
            .get_order_summaries(&query(&[("page", "2"), ("size", "100")]))
            .await
    );

    assert_eq!(page.content().len(), 50);
    assert_eq!(page.total_elements(), 250);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.content()[0].order_id, 201);
}

#[tokio::test]
async fn test_results_are_newest_first() {
    let repository = delivered(5);
    let service = service_with(&repository);

    let page = assert_ok!(service.get_order_summaries(&query(&[("size", "5")])).await);
    let dates: Vec<_> = page.content().iter().map(|o| o.order_date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn test_days_ago_window_excludes_older_orders() {
    let now = test_clock().now();
    let repository = delivered(2);
    repository.insert_all([sample_order(50, "DELIVERED", now - TimeDelta::days(10))]);
    let service = service_with(&repository);

    let week = assert_ok!(service.get_order_summaries(&query(&[("daysAgo", "7")])).await);
    assert_eq!(week.total_elements(), 2);

    let month = assert_ok!(service.get_order_summaries(&query(&[("daysAgo", "30")])).await);
    assert_eq!(month.total_elements(), 3);
}

#[tokio::test]
async fn test_empty_result() {
    let repository = InMemoryOrderSummaryRepository::new();
    let service = service_with(&repository);

    let page = assert_ok!(service.get_order_summaries(&query(&[("status", "UNKNOWN")])).await);

    assert!(page.content().is_empty());
    assert_eq!(page.total_elements(), 0);
    assert_eq!(page.total_pages(), 0);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_but_keeps_totals() {
    let repository = delivered(10);
    let service = service_with(&repository);

    let page = assert_ok!(
        service
            .get_order_summaries(&query(&[("page", "5"), ("size", "5")]))
            .await
    );

    assert!(page.content().is_empty());
    assert_eq!(page.total_elements(), 10);
    assert_eq!(page.total_pages(), 2);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_invalid_parameters_never_reach_the_repository() {
    let repository = delivered(3);
    let service = service_with(&repository);

    for raw in [
        query(&[("page", "abc")]),
        query(&[("size", "0")]),
        query(&[("size", "-1")]),
        query(&[("daysAgo", "soon")]),
        query(&[("page", "-3")]),
    ] {
        let error = assert_err!(service.get_order_summaries(&raw).await);
        assert!(
            matches!(error, QueryError::InvalidParameter { .. }),
            "unexpected error: {error:?}"
        );
    }

    assert_eq!(repository.total_calls(), 0);
}

// ============================================================================
// Failure propagation
// ============================================================================

#[tokio::test]
async fn test_count_failure_discards_resolved_list() {
    let repository = delivered(3);
    repository.fail_count_with("count timed out");
    repository.delay_count(Duration::from_millis(20));
    let service = service_with(&repository);

    let error = assert_err!(service.get_order_summaries(&RawOrderQuery::default()).await);

    assert!(matches!(error, QueryError::DataAccess(_)));
    assert!(error.to_string().contains("count timed out"));
    assert_eq!(repository.find_completed(), 1);
}

#[tokio::test]
async fn test_list_failure_fails_fast() {
    let repository = delivered(3);
    repository.fail_find_with("relation does not exist");
    repository.delay_count(Duration::from_secs(5));
    let service = service_with(&repository);

    let started = Instant::now();
    let error = assert_err!(service.get_order_summaries(&RawOrderQuery::default()).await);

    assert!(matches!(error, QueryError::DataAccess(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(repository.count_calls(), 1);
    assert_eq!(repository.count_completed(), 0);
}

// ============================================================================
// Concurrency & cancellation
// ============================================================================

#[tokio::test]
async fn test_list_and_count_run_concurrently() {
    let repository = delivered(3);
    repository.delay_find(Duration::from_millis(200));
    repository.delay_count(Duration::from_millis(200));
    let service = service_with(&repository);

    let started = Instant::now();
    assert_ok!(service.get_order_summaries(&RawOrderQuery::default()).await);

    // Sequential execution would take at least 400ms.
    assert!(started.elapsed() < Duration::from_millis(350));
}

#[tokio::test]
async fn test_dropping_the_request_abandons_both_calls() {
    let repository = delivered(3);
    repository.delay_find(Duration::from_millis(300));
    repository.delay_count(Duration::from_millis(300));
    let service = service_with(&repository);

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        service.get_order_summaries(&RawOrderQuery::default()),
    )
    .await;
    assert!(outcome.is_err(), "query should have timed out");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(repository.find_calls(), 1);
    assert_eq!(repository.count_calls(), 1);
    assert_eq!(repository.find_completed(), 0);
    assert_eq!(repository.count_completed(), 0);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let repository = delivered(30);
    let service = Arc::new(service_with(&repository));

    let handles: Vec<_> = (0..3u32)
        .map(|page| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let raw = query(&[("page", &page.to_string()), ("size", "10")]);
                service.get_order_summaries(&raw).await
            })
        })
        .collect();

    let mut first_ids = Vec::new();
    for handle in handles {
        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.content().len(), 10);
        first_ids.push(page.content()[0].order_id);
    }
    assert_eq!(first_ids, vec![1, 11, 21]);
    assert_eq!(repository.total_calls(), 6);
}

// ============================================================================
// Read skew
// ============================================================================

#[tokio::test]
async fn test_count_lagging_behind_list_is_reconciled() {
    let repository = delivered(15);
    repository.override_count(4);
    let service = service_with(&repository);

    let page = assert_ok!(
        service
            .get_order_summaries(&query(&[("page", "1"), ("size", "10")]))
            .await
    );

    assert_eq!(page.content().len(), 5);
    assert_eq!(page.total_elements(), 15);
    assert_eq!(page.total_pages(), 2);
}

#[tokio::test]
async fn test_count_ahead_of_list_is_reported_as_is() {
    let repository = delivered(2);
    repository.override_count(7);
    let service = service_with(&repository);

    let page = assert_ok!(service.get_order_summaries(&query(&[("size", "5")])).await);

    assert_eq!(page.content().len(), 2);
    assert_eq!(page.total_elements(), 7);
    assert_eq!(page.total_pages(), 2);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_page_shape_matches_store(total in 0usize..120, page in 0u32..8, size in 1u32..40) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let repository = delivered(total);
        let service = service_with(&repository);
        let raw = query(&[("page", &page.to_string()), ("size", &size.to_string())]);

        let result = runtime.block_on(service.get_order_summaries(&raw)).unwrap();

        let offset = (page * size) as usize;
        let expected_len = total.saturating_sub(offset).min(size as usize);
        prop_assert_eq!(result.content().len(), expected_len);
        prop_assert_eq!(result.total_elements(), total as u64);
        prop_assert_eq!(result.total_pages(), (total as u64).div_ceil(u64::from(size)));
    }
}
