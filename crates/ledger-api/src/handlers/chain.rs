//! Rollback and reset handlers.

use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use ledger_state::StateError;
use serde::Serialize;
use std::collections::HashMap;

/// Response for a completed rollback.
#[derive(Serialize)]
pub struct RollbackResponse {
    pub status: &'static str,
    pub height: u32,
}

/// Response for a completed reset.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub status: &'static str,
    pub current_height: u32,
    pub blocks_count: usize,
    pub utxos_count: usize,
    pub balances_count: usize,
}

/// POST /rollback?height=N
///
/// Roll the chain back to the target height, undoing every block above
/// it. The target must be an integer >= 1 and at most the current
/// height.
pub async fn rollback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<RollbackResponse>> {
    // The raw query string is parsed by hand so that a missing or
    // malformed height surfaces as the ledger's own error, not as a
    // framework rejection.
    let target: u64 = params
        .get("height")
        .and_then(|raw| raw.parse().ok())
        .ok_or(ApiError::State(StateError::InvalidHeightParam))?;

    let height = state.engine.rollback_to(target)?;

    Ok(Json(RollbackResponse {
        status: "Rollback successful",
        height,
    }))
}

/// POST /reset
///
/// Delete every block, transaction, output, and balance, returning the
/// chain to genesis.
pub async fn reset(State(state): State<AppState>) -> ApiResult<Json<ResetResponse>> {
    state.engine.reset()?;
    let summary = state.engine.summary();

    Ok(Json(ResetResponse {
        status: "Reset successful",
        current_height: summary.current_height,
        blocks_count: summary.block_count,
        utxos_count: summary.utxo_count,
        balances_count: summary.balance_count,
    }))
}
