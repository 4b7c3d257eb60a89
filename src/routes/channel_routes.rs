//! Channel listing and selection.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::api_status;
use crate::models::{Channel, ChannelSelection, User};
use crate::state::AppState;
use crate::utils::http_helpers::{ApiError, HTTPError};

/// Registers channel routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/channels", get(list_channels).fallback(api_status))
        .route("/channels/select", post(select_channel).fallback(api_status))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelsResponse {
    channels: Vec<Channel>,
    selected_channel_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SelectChannelRequest {
    channel_id: Option<String>,
}

/// Lists the caller's channels together with their persisted selection.
async fn list_channels(
    user: User,
    State(state): State<AppState>,
) -> Result<Json<ChannelsResponse>, HTTPError> {
    let channels = state
        .youtube
        .list_channels(&user.access_token)
        .await
        .map_err(ApiError::upstream("fetch channels"))?;

    // A missing or unreadable selection is reported as "none selected".
    let selected_channel_id = match state.store.get_selected_channel(&user.id).await {
        Ok(selected) => selected,
        Err(e) => {
            warn!("Could not read channel selection for '{}': {}", user.id, e);
            None
        }
    };

    Ok(Json(ChannelsResponse {
        channels,
        selected_channel_id,
    }))
}

/// Persists the caller's active channel; the last write wins.
async fn select_channel(
    user: User,
    State(state): State<AppState>,
    body: Result<Json<SelectChannelRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), HTTPError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let channel_id = request
        .channel_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Channel ID required".to_string()))?;

    state
        .store
        .save_selection(&ChannelSelection::new(&user.id, &channel_id))
        .await
        .map_err(ApiError::upstream("select channel"))?;

    info!("User '{}' selected channel '{}'", user.id, channel_id);
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Channel selected successfully" })),
    ))
}
