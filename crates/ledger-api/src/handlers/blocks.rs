//! Block submission and listing handlers.

use crate::{ApiResult, AppState};
use axum::{extract::State, Json};
use ledger_consensus::Block;
use serde::Serialize;

/// Response for an accepted block.
#[derive(Serialize)]
pub struct BlockAccepted {
    pub status: &'static str,
    pub height: u32,
}

/// One row of the block listing.
#[derive(Serialize)]
pub struct BlockSummary {
    pub id: String,
    pub height: u32,
}

/// The block listing response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockListing {
    pub blocks: Vec<BlockSummary>,
    pub count: usize,
    pub current_height: u32,
}

/// POST /blocks
///
/// Validate and apply the next block. Blocks must arrive in strict
/// height order; the first block has height 1.
pub async fn submit_block(
    State(state): State<AppState>,
    Json(block): Json<Block>,
) -> ApiResult<Json<BlockAccepted>> {
    let height = state.engine.submit_block(block)?;

    Ok(Json(BlockAccepted {
        status: "Block accepted",
        height,
    }))
}

/// GET /blocks
///
/// List accepted blocks as (id, height) rows in ascending height order.
pub async fn list_blocks(State(state): State<AppState>) -> Json<BlockListing> {
    let listing = state.engine.block_listing();

    Json(BlockListing {
        blocks: listing
            .blocks
            .into_iter()
            .map(|b| BlockSummary {
                id: b.id,
                height: b.height,
            })
            .collect(),
        count: listing.count,
        current_height: listing.current_height,
    })
}
