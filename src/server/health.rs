//! Health check endpoint for orchestrators
//!
//! - `/healthz` - Liveness: Is the process alive?

use axum::{http::StatusCode, routing::get, Router};

/// Liveness probe handler
///
/// Always returns 200 OK with body `ok`. The request is never inspected.
async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Build the router for the health endpoint
pub fn build_router() -> Router {
    Router::new().route("/healthz", get(healthz))
}
