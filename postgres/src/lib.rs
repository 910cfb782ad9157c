//! `PostgreSQL` order-summary repository.
//!
//! Implements [`OrderSummaryRepository`] over three read-model tables
//! (`orders`, `customers`, `products`), joined for the list query:
//!
//! ```sql
//! SELECT o.order_id, c.name AS customer_name, p.product_name, o.quantity,
//!        o.total_amount, o.order_status, o.order_date
//! FROM orders o
//! JOIN customers c ON o.customer_id = c.customer_id
//! JOIN products p ON o.product_id = p.product_id
//! WHERE o.order_status = $1 AND o.order_date >= $2
//! ORDER BY o.order_date DESC, o.order_id DESC
//! LIMIT $3 OFFSET $4
//! ```
//!
//! The count query filters `orders` alone with the same predicate. Both are
//! served by the `(order_status, order_date DESC)` index.
//!
//! # Example
//!
//! ```ignore
//! use order_query_postgres::{PoolSettings, PostgresOrderSummaryRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = PostgresOrderSummaryRepository::connect(
//!         "postgres://localhost/orders",
//!         &PoolSettings::default(),
//!     )
//!     .await?;
//!     repository.migrate().await?;
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use order_query_core::{
    Decimal, OrderFilter, OrderSummary, OrderSummaryRepository, RepositoryError, RepositoryFuture,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const FIND_SUMMARIES_SQL: &str = r"
    SELECT
        o.order_id,
        c.name AS customer_name,
        p.product_name,
        o.quantity,
        o.total_amount,
        o.order_status,
        o.order_date
    FROM orders o
    JOIN customers c ON o.customer_id = c.customer_id
    JOIN products p ON o.product_id = p.product_id
    WHERE o.order_status = $1
      AND o.order_date >= $2
    ORDER BY o.order_date DESC, o.order_id DESC
    LIMIT $3 OFFSET $4
";

const COUNT_SUMMARIES_SQL: &str = r"
    SELECT COUNT(*)
    FROM orders o
    WHERE o.order_status = $1
      AND o.order_date >= $2
";

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long to wait for a connection from the pool
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long
    pub idle_timeout: Duration,
    /// Server-side `statement_timeout` applied to every connection
    pub statement_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            statement_timeout: Duration::from_secs(60),
        }
    }
}

/// One row of the list query.
#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    order_id: i64,
    customer_name: String,
    product_name: String,
    quantity: i32,
    total_amount: Decimal,
    order_status: String,
    order_date: DateTime<Utc>,
}

impl From<OrderSummaryRow> for OrderSummary {
    fn from(row: OrderSummaryRow) -> Self {
        Self {
            order_id: row.order_id,
            customer_name: row.customer_name,
            product_name: row.product_name,
            quantity: row.quantity,
            total_amount: row.total_amount,
            order_status: row.order_status,
            order_date: row.order_date,
        }
    }
}

/// PostgreSQL-backed [`OrderSummaryRepository`].
///
/// Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct PostgresOrderSummaryRepository {
    pool: PgPool,
}

impl PostgresOrderSummaryRepository {
    /// Create a repository over an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool with the given settings.
    ///
    /// Every new connection runs `SET statement_timeout` so that a stuck query
    /// is cancelled by the server even if the caller stops waiting.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the pool cannot connect.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self, RepositoryError> {
        let statement_timeout_ms = settings.statement_timeout.as_millis();

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(Some(settings.idle_timeout))
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    let sql = format!("SET statement_timeout = {statement_timeout_ms}");
                    sqlx::query(&sql).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to connect: {e}")))?;

        tracing::info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            statement_timeout_ms = u64::try_from(statement_timeout_ms).unwrap_or(u64::MAX),
            "PostgreSQL pool ready"
        );

        Ok(Self::from_pool(pool))
    }

    /// Run database migrations for the read-model tables.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if migration fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Check that the database answers a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_sqlx_error(error: sqlx::Error) -> RepositoryError {
    match error {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            RepositoryError::Decode(error.to_string())
        }
        other => RepositoryError::Database(other.to_string()),
    }
}

/// Bind value for `LIMIT` / `OFFSET`; both fit in `BIGINT` after normalization.
fn as_bigint(value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::Database(format!("LIMIT/OFFSET {value} exceeds BIGINT")))
}

impl OrderSummaryRepository for PostgresOrderSummaryRepository {
    fn find_summaries<'a>(
        &'a self,
        filter: &'a OrderFilter,
    ) -> RepositoryFuture<'a, Vec<OrderSummary>> {
        Box::pin(async move {
            let limit = i64::from(filter.size);
            let offset = as_bigint(filter.offset())?;

            let rows: Vec<OrderSummaryRow> = sqlx::query_as(FIND_SUMMARIES_SQL)
                .bind(filter.status.as_str())
                .bind(filter.since)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            Ok(rows.into_iter().map(OrderSummary::from).collect())
        })
    }

    fn count_summaries<'a>(&'a self, filter: &'a OrderFilter) -> RepositoryFuture<'a, u64> {
        Box::pin(async move {
            let (count,): (i64,) = sqlx::query_as(COUNT_SUMMARIES_SQL)
                .bind(filter.status.as_str())
                .bind(filter.since)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            u64::try_from(count)
                .map_err(|_| RepositoryError::Decode(format!("negative row count {count}")))
        })
    }
}
