//! Application startup and server initialization.
//!
//! This module builds the shared state from the configuration and runs the HTTP server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::Auth;
use crate::config::ConfigV1;
use crate::oauth::OAuthClient;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;
use crate::utils::cors::CorsHeaders;
use crate::youtube::YouTubeClient;

/// Builds every shared component named in the configuration.
///
/// # Errors
///
/// Returns an error if a configured URL or CORS origin is invalid, or the store
/// cannot be reached.
pub async fn build_state(config: Arc<ConfigV1>) -> Result<AppState, String> {
    let store = create_store(&config.store).await?;
    let auth = Arc::new(Auth::new(&config.providers));
    let oauth = Arc::new(OAuthClient::new(&config.google, &config.frontend)?);
    let youtube = Arc::new(YouTubeClient::new(&config.youtube));
    let cors = CorsHeaders::new(&config.cors)?;

    Ok(AppState {
        config,
        auth,
        oauth,
        youtube,
        store,
        cors,
    })
}

/// Initializes and runs the application server.
///
/// Binds to the address specified in the configuration and serves until the
/// process is stopped.
///
/// # Errors
///
/// Returns an error if the state cannot be built, the server fails to bind,
/// or it encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone()).await?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Starting server on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
