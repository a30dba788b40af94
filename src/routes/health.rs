// src/routes/health.rs
//! Liveness endpoint for the agrisense backend.
//!
//! Used by container orchestrators and CI to confirm the process is up and
//! answering HTTP. Sibling of the resource modules in `routes` (EMBP):
//! - Internal to this file: the handler and its response type
//! - Exports to the gateway (`mod.rs`): a subrouter with `/health` and `/api/health`

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the health endpoints.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Handle `GET /health` and `GET /api/health`.
///
/// Does not touch the store; a slow database must not fail liveness.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create a subrouter containing the health routes.
///
/// Generic over the application state so it merges into the gateway router
/// whatever the state type is.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
}
