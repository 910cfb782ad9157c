//! Prometheus metrics for observability and monitoring.
//!
//! Covers the order-summary query:
//! - Requests by outcome
//! - End-to-end query latency
//! - Rows returned
//!
//! The exporter does not bind its own listener. The rendered text is served by
//! the HTTP layer on `GET /metrics`.
//!
//! # Example
//!
//! ```rust,no_run
//! use order_query_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.start()?;
//!
//! if let Some(text) = exporter.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use order_query_core::{OrderSummary, PageResult, QueryError};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Total query requests, labelled by `outcome`.
pub const REQUESTS_TOTAL: &str = "order_query_requests_total";
/// End-to-end query latency.
pub const DURATION_SECONDS: &str = "order_query_duration_seconds";
/// Rows returned across all successful queries.
pub const ROWS_RETURNED_TOTAL: &str = "order_query_rows_returned_total";

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder plus the handle used to render the scrape body.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

impl MetricsExporter {
    /// Create an exporter that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., in tests), this logs a warning
    /// and succeeds without a handle, so [`render`](Self::render) returns `None`.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                // Descriptions go to the recorder that is current, so register after install.
                register_metrics();
                tracing::info!("Metrics recorder installed, exposed on /metrics");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Take ownership of the handle (it is cheap to clone and share).
    #[must_use]
    pub fn into_handle(self) -> Option<PrometheusHandle> {
        self.handle
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if the recorder was not installed by this exporter.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        REQUESTS_TOTAL,
        "Total number of order summary queries, by outcome"
    );
    describe_histogram!(
        DURATION_SECONDS,
        "Time taken to answer an order summary query"
    );
    describe_counter!(
        ROWS_RETURNED_TOTAL,
        "Total number of order summaries returned"
    );
}

/// Order query metrics recorder.
pub struct QueryMetrics;

impl QueryMetrics {
    /// Record the outcome of one query.
    pub fn record(result: &Result<PageResult<OrderSummary>, QueryError>, duration: Duration) {
        match result {
            Ok(page) => Self::record_success(page.content().len(), duration),
            Err(error) => Self::record_failure(error.kind(), duration),
        }
    }

    /// Record a successful query.
    pub fn record_success(rows: usize, duration: Duration) {
        counter!(REQUESTS_TOTAL, "outcome" => "ok").increment(1);
        counter!(ROWS_RETURNED_TOTAL).increment(u64::try_from(rows).unwrap_or(u64::MAX));
        histogram!(DURATION_SECONDS).record(duration.as_secs_f64());
    }

    /// Record a failed query under its error kind.
    pub fn record_failure(kind: &'static str, duration: Duration) {
        counter!(REQUESTS_TOTAL, "outcome" => kind).increment(1);
        histogram!(DURATION_SECONDS).record(duration.as_secs_f64());
    }
}
