//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, authentication, the OAuth client, the
//! YouTube client and the test store.

use crate::auth::Auth;
use crate::config::ConfigV1;
use crate::oauth::OAuthClient;
use crate::store::Store;
use crate::utils::cors::CorsHeaders;
use crate::youtube::VideoProvider;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Bearer token validation across the configured providers.
    pub auth: Arc<Auth>,
    /// Authorization-code flow against Google.
    pub oauth: Arc<OAuthClient>,
    /// Channel and video listings, called with the caller's token.
    pub youtube: Arc<dyn VideoProvider>,
    /// Channel selections and A/B tests.
    pub store: Arc<dyn Store>,
    /// CORS headers stamped on every response.
    pub cors: CorsHeaders,
}
