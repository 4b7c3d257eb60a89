//! Health check endpoints.

use super::api_status;
use crate::state::AppState;
use axum::{
    body::Body,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check).fallback(api_status))
}

/// Simple health check endpoint. Unauthenticated, so load balancers can probe it.
async fn health_check() -> impl IntoResponse {
    Response::new(Body::from("OK"))
}
