//! Health check endpoints.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Health check endpoint.
///
/// Returns 200 OK if the service is running. This is a simple liveness
/// check - it doesn't verify dependencies.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Whether the service should receive traffic
    pub ready: bool,
}

/// Readiness check endpoint.
///
/// Returns 200 OK once the process is accepting connections. Used by
/// orchestrator readiness probes.
pub async fn readiness_check() -> (StatusCode, Json<ReadinessResponse>) {
    // Readiness mirrors liveness: the repositories expose no cheap health
    // surface, so a process that serves this route is ready for traffic.
    (StatusCode::OK, Json(ReadinessResponse { ready: true }))
}
