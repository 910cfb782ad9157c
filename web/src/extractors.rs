//! Custom Axum extractors.

use crate::middleware::correlation_id_from_headers;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Taken from request extensions when the correlation middleware is installed;
/// otherwise parsed from the `X-Correlation-ID` header, or generated.
///
/// # Example
///
/// ```ignore
/// async fn handler(correlation_id: CorrelationId) -> String {
///     format!("Request ID: {}", correlation_id.0)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(correlation_id) = parts.extensions.get::<Self>() {
            return Ok(*correlation_id);
        }

        Ok(Self(
            correlation_id_from_headers(&parts.headers).unwrap_or_else(Uuid::new_v4),
        ))
    }
}
