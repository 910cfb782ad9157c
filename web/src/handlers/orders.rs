//! Order summary endpoint.

use crate::{extractors::CorrelationId, AppError, AppState, WebResult};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use order_query_core::{to_payload, OrderSummary, PagePayload, RawOrderQuery};

/// List order summaries, newest first, one page at a time.
///
/// # Endpoint
///
/// ```text
/// GET /api/orders?status=DELIVERED&daysAgo=30&page=0&size=100
/// ```
///
/// Every parameter is optional.
///
/// # Response
///
/// ```json
/// {
///   "content": [{ "orderId": 1, "customerName": "Ada", "...": "..." }],
///   "page": 0,
///   "size": 100,
///   "totalElements": 1,
///   "totalPages": 1
/// }
/// ```
///
/// # Errors
///
/// - 400 `BAD_REQUEST` for a malformed parameter
/// - 500 `DATA_ACCESS_ERROR` if the database read fails
pub async fn list_orders(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    query: Result<Query<RawOrderQuery>, QueryRejection>,
) -> WebResult<Json<PagePayload<OrderSummary>>> {
    let Query(raw) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    tracing::debug!(correlation_id = %correlation_id.0, ?raw, "Listing order summaries");

    let page = state.service().get_order_summaries(&raw).await?;

    Ok(Json(to_payload(page)))
}
