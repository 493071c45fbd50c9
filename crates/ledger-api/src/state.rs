//! Shared application state.

use ledger_state::ChainEngine;
use std::sync::Arc;

/// Shared application state for API handlers. Every handler receives
/// the chain engine through this struct; nothing lives in globals.
#[derive(Clone)]
pub struct AppState {
    /// The chain state engine.
    pub engine: Arc<ChainEngine>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: Arc<ChainEngine>) -> Self {
        Self { engine }
    }
}
