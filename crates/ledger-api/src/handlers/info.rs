//! Welcome handler.

use axum::Json;
use serde::Serialize;

/// Welcome banner.
#[derive(Serialize)]
pub struct Welcome {
    pub welcome: &'static str,
}

/// GET /
pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        welcome: "in blockchain",
    })
}
