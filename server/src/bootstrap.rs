//! Startup wiring.

use crate::config::Config;
use crate::readiness::DatabaseReadiness;
use anyhow::Context;
use order_query_core::environment::SystemClock;
use order_query_postgres::PostgresOrderSummaryRepository;
use order_query_runtime::{metrics::MetricsExporter, OrderQueryService};
use order_query_web::AppState;
use std::sync::Arc;

/// Connect to the database and assemble the HTTP application state.
///
/// 1. Open the connection pool
/// 2. Apply migrations (unless disabled)
/// 3. Install the Prometheus recorder (unless disabled)
/// 4. Wire the repository and system clock into the query service
///
/// # Errors
///
/// Returns an error if the pool cannot connect, a migration fails, or the
/// metrics recorder cannot be installed.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let repository =
        PostgresOrderSummaryRepository::connect(&config.database.url, &config.database.pool_settings())
            .await
            .context("Failed to connect to PostgreSQL")?;
    tracing::info!("✓ Database connected");

    if config.database.run_migrations {
        repository.migrate().await.context("Failed to run migrations")?;
        tracing::info!("✓ Migrations applied");
    } else {
        tracing::info!("Skipping migrations (DATABASE_RUN_MIGRATIONS=false)");
    }

    let metrics = if config.server.metrics_enabled {
        let mut exporter = MetricsExporter::new();
        exporter.start().context("Failed to install metrics exporter")?;
        exporter.into_handle()
    } else {
        tracing::info!("Metrics disabled (METRICS_ENABLED=false)");
        None
    };

    let readiness = Arc::new(DatabaseReadiness::new(repository.clone()));
    let service = OrderQueryService::new(Arc::new(repository), Arc::new(SystemClock));

    Ok(AppState::new(service)
        .with_metrics(metrics)
        .with_readiness(readiness))
}
