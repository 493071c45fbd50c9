//! Balance lookup handler.

use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

/// Balance response.
#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: i64,
}

/// GET /balance/:address
///
/// Balance of an address. Unknown addresses read as 0; the lookup never
/// fails and never creates an entry.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<BalanceResponse> {
    let balance = state.engine.balance(&address);

    Json(BalanceResponse { address, balance })
}
