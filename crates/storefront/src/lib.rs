//! Minicart storefront library.
//!
//! Serves customer-data sections (the mini-cart snapshot first among them)
//! to browser widgets. The crate is a library so the router can be tested
//! and embedded; `main.rs` only wires configuration, telemetry and the
//! listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod sections;
pub mod services;
pub mod session;
pub mod state;

use axum::extract::Request;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::session::SaveHandler;
use crate::state::AppState;

/// Build the application router with sessions, request IDs and tracing.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn app(state: AppState, store: SaveHandler) -> Router {
    let session_layer = middleware::create_session_layer(store, state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
