use axum::{http::StatusCode, Json};
use serde_json::json;

/// Fallback for any method/path outside the routing table.
pub async fn handler() -> impl axum::response::IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
