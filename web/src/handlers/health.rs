//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Reason reported by `/ready` on failure. The underlying error is only logged.
const UNREACHABLE_REASON: &str = "database unreachable";

/// Liveness body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Readiness body.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// `"ready"` or `"unavailable"`
    pub status: &'static str,
    /// Why the service is not ready (fixed text; details go to the log)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check dependencies (database, etc.).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "version": "0.1.0"
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check: runs the configured probe.
///
/// # Status Codes
///
/// - 200 OK: probe passed, or no probe is configured
/// - 503 Service Unavailable: probe failed
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let outcome = match state.readiness() {
        Some(probe) => probe.check().await,
        None => Ok(()),
    };

    match outcome {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                reason: None,
            }),
        ),
        Err(error) => {
            tracing::warn!(%error, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable",
                    reason: Some(UNREACHABLE_REASON.to_string()),
                }),
            )
        }
    }
}
