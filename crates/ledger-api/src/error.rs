//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_consensus::ValidationError;
use ledger_state::StateError;
use serde::Serialize;
use thiserror::Error;

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine error (validation, rewind preconditions, storage).
    #[error(transparent)]
    State(#[from] StateError),
}

/// Error response body. `expected`, `received` and `hash_input` are only
/// populated for block-identity rejections.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash_input: Option<String>,
}

impl ErrorResponse {
    fn plain(error: String) -> Self {
        Self {
            error,
            expected: None,
            received: None,
            hash_input: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::State(err) = self;

        let (status, body) = match &err {
            // Identity mismatches report the computed digest, the
            // submitted id, and the digest preimage for debugging.
            StateError::Validation(ValidationError::InvalidBlockId {
                expected,
                received,
                hash_input,
            }) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: err.to_string(),
                    expected: Some(expected.clone()),
                    received: Some(received.clone()),
                    hash_input: Some(hash_input.clone()),
                },
            ),
            StateError::Validation(_)
            | StateError::InvalidHeightParam
            | StateError::TargetAboveHead { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::plain(err.to_string()),
            ),
            StateError::Storage(_) | StateError::Corruption(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::plain(err.to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
