//! OAuth handshake endpoints. Both legs answer with a `302 Found` redirect.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use tracing::info;

use super::api_status;
use crate::oauth::CallbackParams;
use crate::state::AppState;

/// Registers the login and callback routes under both of their paths.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login).fallback(api_status))
        .route("/auth", get(login).fallback(api_status))
        .route("/callback", get(callback).fallback(api_status))
        .route("/auth/callback", get(callback).fallback(api_status))
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn login(State(state): State<AppState>) -> Response {
    info!("Redirecting to Google consent screen");
    found(state.oauth.authorization_url())
}

async fn callback(State(state): State<AppState>, Query(params): Query<CallbackParams>) -> Response {
    found(state.oauth.complete(params).await)
}
