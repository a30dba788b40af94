//! Route gateway for the `agrisense` HTTP API.
//!
//! Each sibling module exports a subrouter; this gateway merges them, binds
//! the shared [`AppState`] and wraps everything in request tracing. `main.rs`
//! only ever calls [`router`].

use std::sync::Arc;

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::{Config, Store};

mod extract;
mod farms;
mod health;
mod sensors;

// ---

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

/// `?days=N` query string. Absent means the endpoint's default.
#[derive(Debug, Deserialize)]
struct DaysQuery {
    days: Option<i64>,
}

pub fn router(store: Arc<dyn Store>, config: Config) -> Router {
    // ---
    Router::new()
        .merge(farms::router())
        .merge(sensors::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store, config })
}
