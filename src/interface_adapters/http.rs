// Plain HTTP routes and the shared JSON error payload.

use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    // Human-readable error string for consistent JSON error responses.
    pub error: String,
}

/// Latest serialized frame, the same bytes the WebSocket stream carries.
pub async fn latest_frame_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let latest = state.frame_latest_tx.borrow().clone();
    if latest.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "no frame rendered yet".to_string(),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        latest.as_str().to_owned(),
    )
        .into_response()
}
