//! Prometheus scrape endpoint.

use crate::{AppError, AppState, WebResult};
use axum::{extract::State, http::header};
use axum::response::IntoResponse;

/// Prometheus text exposition content type.
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Render current metrics.
///
/// # Errors
///
/// 503 `SERVICE_UNAVAILABLE` when the exporter was not installed.
#[allow(clippy::unused_async)]
pub async fn render_metrics(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let handle = state
        .metrics()
        .ok_or_else(|| AppError::unavailable("Metrics exporter is not installed"))?;

    Ok(([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], handle.render()))
}
