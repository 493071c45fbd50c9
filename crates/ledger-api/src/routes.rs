//! API route definitions.

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info::welcome))
        .route(
            "/blocks",
            post(handlers::blocks::submit_block).get(handlers::blocks::list_blocks),
        )
        .route("/balance/:address", get(handlers::balance::get_balance))
        .route("/rollback", post(handlers::chain::rollback))
        .route("/reset", post(handlers::chain::reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
