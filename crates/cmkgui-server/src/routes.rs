//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Create the router for token-authenticated pages.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/shared_dashboard.py", get(handlers::shared_dashboard))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
