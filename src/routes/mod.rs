//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! the OAuth handshake, channels, videos, tests, health checks and the
//! status fallback for everything else.

mod auth_routes;
mod channel_routes;
mod health_routes;
mod status_routes;
mod test_routes;
mod video_routes;

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::state::AppState;
use crate::utils::cors::cors;
use crate::utils::http_helpers::HTTPError;

pub(crate) use status_routes::api_status;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches the application state.
/// Layers, innermost first: request tracing, panic recovery, CORS. CORS is outermost so
/// preflights skip everything else and panic responses still carry the headers.
pub fn create_router(state: AppState) -> Router {
    let cors_headers = state.cors.clone();
    Router::new()
        .merge(auth_routes::routes())
        .merge(channel_routes::routes())
        .merge(video_routes::routes())
        .merge(test_routes::routes())
        .merge(health_routes::routes())
        .fallback(api_status)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(cors_headers, cors))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "handler panicked");
    HTTPError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Server error: {}", detail),
        None,
    )
    .into_response()
}
