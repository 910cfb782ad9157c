//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use order_query_runtime::OrderQueryService;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by [`ReadinessProbe::check`].
pub type ReadinessFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Dependency check behind `GET /ready`.
///
/// Implemented by the binary for whatever backs the repository (for Postgres,
/// a `SELECT 1` against the pool).
pub trait ReadinessProbe: Send + Sync {
    /// Resolve to `Ok(())` when the dependency can serve queries.
    fn check(&self) -> ReadinessFuture<'_>;
}

/// Application state shared across all HTTP handlers.
///
/// # Examples
///
/// ```ignore
/// use order_query_web::AppState;
///
/// let state = AppState::new(service)
///     .with_metrics(exporter.into_handle())
///     .with_readiness(Arc::new(DatabaseReadiness::new(repository)));
/// ```
#[derive(Clone)]
pub struct AppState {
    service: OrderQueryService,
    metrics: Option<PrometheusHandle>,
    readiness: Option<Arc<dyn ReadinessProbe>>,
}

impl AppState {
    /// Create state around the query service, with no metrics and no readiness probe.
    #[must_use]
    pub const fn new(service: OrderQueryService) -> Self {
        Self {
            service,
            metrics: None,
            readiness: None,
        }
    }

    /// Attach the Prometheus handle rendered on `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Attach the dependency check run on `GET /ready`.
    #[must_use]
    pub fn with_readiness(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.readiness = Some(probe);
        self
    }

    /// The order query service.
    #[must_use]
    pub const fn service(&self) -> &OrderQueryService {
        &self.service
    }

    /// Prometheus handle, if the exporter was installed.
    #[must_use]
    pub const fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }

    /// Readiness probe, if one was configured.
    #[must_use]
    pub fn readiness(&self) -> Option<&dyn ReadinessProbe> {
        self.readiness.as_deref()
    }
}
