//! # ledger-api
//!
//! REST API for the UTXO ledger indexer.
//!
//! This crate provides the HTTP endpoints of the service:
//! - `GET /` - Welcome banner
//! - `POST /blocks` - Submit the next block
//! - `GET /blocks` - List accepted blocks
//! - `GET /balance/:address` - Address balance lookup
//! - `POST /rollback?height=N` - Rewind the chain
//! - `POST /reset` - Reset to genesis

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

use axum::Router;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Create the API router with all routes.
pub fn build_api(state: AppState) -> Router {
    create_router(state)
}
