use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

/// Header carrying the channel the frontend has selected as active.
pub const CHANNEL_HEADER: &str = "x-youtube-channel-id";

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
    challenge: Option<String>,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code, message and optional
    /// `WWW-Authenticate` challenge.
    pub fn new(status: StatusCode, message: impl Into<String>, challenge: Option<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
            challenge,
        }
    }
}

/// Converts our `HTTPError` into an HTTP response with a `{"error": ...}` body.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(json!({ "error": self.message }))).into_response();
        if let Some(challenge) = self.challenge.and_then(|c| c.parse().ok()) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, challenge);
        }
        response
    }
}

/// Every failure a request can end in, before it is rendered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Missing or invalid authorization header")]
    MissingCredential,
    #[error("Invalid token")]
    InvalidCredential,
    #[error("No channel selected")]
    MissingContext,
    #[error("{0}")]
    Validation(String),
    #[error("Failed to {action}: {message}")]
    Upstream { action: &'static str, message: String },
}

impl ApiError {
    /// Wraps a provider or store failure with the operation it interrupted.
    pub fn upstream(action: &'static str) -> impl FnOnce(String) -> ApiError {
        move |message| ApiError::Upstream { action, message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential | ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::MissingContext | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => ApiError::MissingCredential,
            AuthError::InvalidCredential => ApiError::InvalidCredential,
        }
    }
}

impl From<ApiError> for HTTPError {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "request failed");
        }
        let challenge = (status == StatusCode::UNAUTHORIZED).then(|| "Bearer".to_string());
        HTTPError::new(status, err.to_string(), challenge)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        HTTPError::from(self).into_response()
    }
}

/// Reads the selected channel from the request headers, if a non-empty one is present.
pub fn selected_channel(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CHANNEL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Extractor for the channel context header; rejects with 400 when it is missing.
#[derive(Debug, Clone)]
pub struct ChannelContext(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ChannelContext
where
    S: Send + Sync,
{
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, HTTPError> {
        selected_channel(&parts.headers)
            .map(ChannelContext)
            .ok_or_else(|| ApiError::MissingContext.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_error_statuses() {
        assert_eq!(ApiError::MissingCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MissingContext.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("Channel ID required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::upstream("fetch videos")("quota exceeded".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_embeds_cause() {
        let err = ApiError::upstream("fetch tests")("connection reset".into());
        assert_eq!(err.to_string(), "Failed to fetch tests: connection reset");
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response = ApiError::InvalidCredential.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_selected_channel_ignores_blank_values() {
        let mut headers = HeaderMap::new();
        assert_eq!(selected_channel(&headers), None);

        headers.insert(CHANNEL_HEADER, HeaderValue::from_static("  "));
        assert_eq!(selected_channel(&headers), None);

        headers.insert(CHANNEL_HEADER, HeaderValue::from_static("UC123"));
        assert_eq!(selected_channel(&headers), Some("UC123".to_string()));
    }
}
