//! The catch-all status payload.

use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::models::User;
use crate::utils::http_helpers::selected_channel;

/// Answers any unrouted request from an authenticated caller. `needsChannel` tells the
/// frontend whether it still has to send a channel header.
pub async fn api_status(_user: User, headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "message": "API is running",
        "needsChannel": selected_channel(&headers).is_none(),
    }))
}
