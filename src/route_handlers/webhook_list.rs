use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::error;

use crate::SharedAppState;

/// Serve the full capture history as a JSON array, oldest first. Consumers
/// wanting newest-first reorder client-side; no query parameters exist.
pub async fn handler(State(state): State<SharedAppState>) -> impl axum::response::IntoResponse {
    let state = state.lock().await;
    let records = state.store.read_all();

    match serde_json::to_value(&records) {
        Ok(records) => (StatusCode::OK, Json(records)),
        Err(err) => {
            error!("Failed to serialize webhook history: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load webhooks" })),
            )
        }
    }
}
