use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::storage::WebhookRecord;
use crate::SharedAppState;

/// Ingest one webhook: buffer the body, parse it as JSON (any value shape is
/// accepted, objects and bare primitives alike), and append a record to the
/// store. Nothing is persisted unless the body parses.
pub async fn handler(
    State(state): State<SharedAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl axum::response::IntoResponse {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            debug!("Rejected webhook with unparsable body: {}", err);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON" })),
            );
        }
    };

    let record = WebhookRecord::new(headers_to_json(&headers), payload);

    let state = state.lock().await;
    match state.store.append(record) {
        Ok(()) => {
            info!("Webhook received at {}", chrono::Utc::now().to_rfc3339());
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        Err(err) => {
            error!("Failed to save webhook: {:#}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save webhook" })),
            )
        }
    }
}

/// Capture the inbound header set as a JSON object. A header that appears
/// once maps to a string, a repeated header maps to the ordered list of its
/// values.
fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = serde_json::Map::new();

    for key in headers.keys() {
        let mut values: Vec<Value> = headers
            .get_all(key)
            .iter()
            .map(|value| Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();

        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Array(values)
        };
        map.insert(key.as_str().to_string(), value);
    }

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn single_headers_map_to_strings() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("x-github-event", HeaderValue::from_static("push"));

        assert_eq!(
            headers_to_json(&headers),
            json!({
                "content-type": "application/json",
                "x-github-event": "push",
            })
        );
    }

    #[test]
    fn repeated_headers_map_to_ordered_arrays() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));

        assert_eq!(
            headers_to_json(&headers),
            json!({ "x-forwarded-for": ["10.0.0.1", "10.0.0.2"] })
        );
    }
}
