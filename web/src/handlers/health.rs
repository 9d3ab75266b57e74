//! Health check endpoint.
//!
//! Used by load balancers and monitoring systems to verify the service is
//! up. The store lives in memory, so there are no dependencies to probe.

use axum::http::StatusCode;

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
/// ```text
/// 200 OK
/// ok
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
