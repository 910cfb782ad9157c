//! Error taxonomy for the order-summary query.
//!
//! Two layers:
//!
//! - [`RepositoryError`]: raised by implementations of the repository port
//! - [`QueryError`]: what the query as a whole can fail with; wraps
//!   repository failures as [`QueryError::DataAccess`]
//!
//! Nothing here retries. Errors surface to the boundary layer as-is.

use thiserror::Error;

/// Errors raised by an [`OrderSummaryRepository`](crate::OrderSummaryRepository) implementation.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The store rejected or failed the query (connection, timeout, SQL error).
    #[error("Database error: {0}")]
    Database(String),

    /// A row came back but could not be mapped to an [`OrderSummary`](crate::OrderSummary).
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Errors from the order-summary query.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A raw request parameter was malformed or out of range (client-caused).
    #[error("Invalid parameter `{name}` ({value:?}): {reason}")]
    InvalidParameter {
        /// Query-string name of the parameter
        name: &'static str,
        /// Raw value as received
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// One of the repository calls failed; no partial result is produced.
    #[error("Data access error: {0}")]
    DataAccess(#[from] RepositoryError),

    /// An internal precondition was violated (e.g. a zero page size reached the pagination math).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl QueryError {
    /// Build an [`QueryError::InvalidParameter`].
    pub fn invalid_parameter(
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller caused this error (maps to a 4xx response).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Short, stable label used for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::DataAccess(_) => "data_access_error",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_parameter_display() {
        let error = QueryError::invalid_parameter("size", "abc", "not an integer");
        let display = error.to_string();
        assert!(display.contains("`size`"));
        assert!(display.contains("\"abc\""));
        assert!(display.contains("not an integer"));
        assert!(error.is_client_error());
    }

    #[test]
    fn data_access_wraps_repository_error() {
        let error = QueryError::from(RepositoryError::Database("connection reset".to_string()));
        assert!(!error.is_client_error());
        assert_eq!(error.kind(), "data_access_error");

        let source = error.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Database error: connection reset"));
    }

    #[test]
    fn invalid_argument_is_server_side() {
        let error = QueryError::InvalidArgument("page size must be positive".to_string());
        assert!(!error.is_client_error());
        assert_eq!(error.kind(), "invalid_argument");
    }
}
