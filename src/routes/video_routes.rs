//! Recent videos of the selected channel.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use super::api_status;
use crate::models::{User, Video};
use crate::state::AppState;
use crate::utils::http_helpers::{ApiError, ChannelContext, HTTPError};

/// Registers video routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/videos", get(list_videos).fallback(api_status))
}

#[derive(Serialize)]
struct VideosResponse {
    videos: Vec<Video>,
}

async fn list_videos(
    user: User,
    ChannelContext(channel_id): ChannelContext,
    State(state): State<AppState>,
) -> Result<Json<VideosResponse>, HTTPError> {
    let videos = state
        .youtube
        .list_videos(&user.access_token, &channel_id)
        .await
        .map_err(ApiError::upstream("fetch videos"))?;
    Ok(Json(VideosResponse { videos }))
}
