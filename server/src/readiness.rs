//! Database readiness probe.

use order_query_postgres::PostgresOrderSummaryRepository;
use order_query_web::{ReadinessFuture, ReadinessProbe};

/// Reports ready when the pool answers `SELECT 1`.
#[derive(Debug, Clone)]
pub struct DatabaseReadiness {
    repository: PostgresOrderSummaryRepository,
}

impl DatabaseReadiness {
    /// Probe the pool behind `repository`.
    #[must_use]
    pub const fn new(repository: PostgresOrderSummaryRepository) -> Self {
        Self { repository }
    }
}

impl ReadinessProbe for DatabaseReadiness {
    fn check(&self) -> ReadinessFuture<'_> {
        Box::pin(async move { self.repository.ping().await.map_err(|e| e.to_string()) })
    }
}
