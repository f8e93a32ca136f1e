//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use ezratask_runtime::HealthCheck;
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `"OK"` while the process serves requests
    pub status: &'static str,
}

/// Simple health check endpoint (for basic liveness).
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
/// { "status": "OK" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "OK" }))
}

/// Health check with store diagnostics (for readiness).
///
/// # Status Codes
///
/// - 200 OK: the store answered within its check timeout
/// - 503 Service Unavailable: the store state lock is stuck
///
/// # Endpoint
///
/// ```text
/// GET /health/ready
/// ```
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthCheck>) {
    let health = state.store.health().await;
    (readiness_status(&health), Json(health))
}

fn readiness_status(health: &HealthCheck) -> StatusCode {
    if health.status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
