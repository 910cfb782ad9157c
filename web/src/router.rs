//! Router assembly.

use crate::handlers::{health_check, list_orders, readiness_check, render_metrics};
use crate::middleware::correlation_id_layer;
use crate::AppState;
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Build the application router.
///
/// A request still running after `request_timeout` is answered with
/// 408 Request Timeout; its handler future, and the database calls it
/// owns, are dropped.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let api = Router::new().route("/orders", get(list_orders));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(render_metrics))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
