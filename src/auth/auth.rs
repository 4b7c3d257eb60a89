use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::User;
use crate::providers::{create_auth_provider, Provider, ProviderConfig};

/// Why a request could not be authenticated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header, or not of the form `Bearer <token>`.
    #[error("missing or malformed bearer credential")]
    MissingCredential,
    /// A well-formed bearer token that no provider accepted.
    #[error("bearer token rejected by every provider")]
    InvalidCredential,
}

/// Holds the configured token validation providers.
pub struct Auth {
    pub providers: Vec<Box<dyn Provider>>,
}

impl Auth {
    /// Initialize the Auth struct by creating providers from the configurations.
    pub fn new(provider_config: &[ProviderConfig]) -> Self {
        info!("Creating auth providers...");
        let providers = provider_config.iter().map(create_auth_provider).collect();
        Auth { providers }
    }

    /// Builds an `Auth` around already constructed providers.
    pub fn from_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Auth { providers }
    }

    /// Extracts the token from a `Bearer <token>` header value.
    pub fn bearer_token(auth_header: Option<&str>) -> Result<&str, AuthError> {
        let header = auth_header.ok_or(AuthError::MissingCredential)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::MissingCredential)?;
        if token.is_empty() || token.contains(char::is_whitespace) {
            return Err(AuthError::MissingCredential);
        }
        Ok(token)
    }

    /// Validates the bearer token in `auth_header`, trying each provider in sequence
    /// and stopping at the first one that accepts it. The returned user carries the token.
    pub async fn authenticate(&self, auth_header: Option<&str>) -> Result<User, AuthError> {
        let token = match Self::bearer_token(auth_header) {
            Ok(token) => token,
            Err(e) => {
                debug!("Authorization header missing or malformed");
                return Err(e);
            }
        };

        for provider in &self.providers {
            match provider.authenticate(token).await {
                Ok(user) => {
                    info!(
                        "Provider '{}' authenticated user '{}'",
                        provider.get_name(),
                        user.id
                    );
                    return Ok(user.with_access_token(token));
                }
                Err(e) => {
                    debug!(
                        "Provider '{}' failed to authenticate: {}",
                        provider.get_name(),
                        e
                    );
                }
            }
        }

        warn!("All providers rejected the bearer token");
        Err(AuthError::InvalidCredential)
    }
}
