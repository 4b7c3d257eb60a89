//! A/B test listing and creation, scoped to the caller and the selected channel.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

use super::api_status;
use crate::models::{AbTest, NewTest, User};
use crate::state::AppState;
use crate::utils::http_helpers::{ApiError, ChannelContext, HTTPError};

/// Registers test routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/tests",
        get(list_tests).post(create_test).fallback(api_status),
    )
}

#[derive(Serialize)]
struct TestsResponse {
    tests: Vec<AbTest>,
}

#[derive(Serialize)]
struct CreatedResponse {
    message: &'static str,
    test: AbTest,
}

async fn list_tests(
    user: User,
    ChannelContext(channel_id): ChannelContext,
    State(state): State<AppState>,
) -> Result<Json<TestsResponse>, HTTPError> {
    let tests = state
        .store
        .list_tests(&user.id, &channel_id)
        .await
        .map_err(ApiError::upstream("fetch tests"))?;
    Ok(Json(TestsResponse { tests }))
}

async fn create_test(
    user: User,
    ChannelContext(channel_id): ChannelContext,
    State(state): State<AppState>,
    body: Result<Json<NewTest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), HTTPError> {
    // An unreadable body is treated like an empty one and fails on the missing video id.
    let fields = body.map(|Json(fields)| fields).unwrap_or_default();
    let test = AbTest::create(&user.id, &channel_id, fields).map_err(ApiError::Validation)?;

    state
        .store
        .create_test(&test)
        .await
        .map_err(ApiError::upstream("create test"))?;

    info!(
        "User '{}' created test '{}' for video '{}'",
        user.id, test.test_id, test.video_id
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Test created",
            test,
        }),
    ))
}
