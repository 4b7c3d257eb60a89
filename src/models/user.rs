use std::fmt;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::state::AppState;
use crate::utils::http_helpers::{ApiError, HTTPError};

/// The User struct represents an authenticated caller.
///
/// `id` is the opaque identifier issued by the identity provider and is the key every
/// stored record is scoped by. The access token travels with the user so handlers can
/// call the YouTube API on the caller's behalf.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    /// Name of the provider that accepted the token.
    pub provider: String,
    pub access_token: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: Option<String>, provider: impl Into<String>) -> Self {
        User {
            id: id.into(),
            name,
            provider: provider.into(),
            access_token: String::new(),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }
}

// Debug omits the access token.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// Implementation of the request extractor for User.
/// Reads the `Authorization` header and runs it through `Auth::authenticate`.
#[async_trait]
impl FromRequestParts<AppState> for User {
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<User, HTTPError> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        state
            .auth
            .authenticate(auth_header)
            .await
            .map_err(|e| HTTPError::from(ApiError::from(e)))
    }
}
