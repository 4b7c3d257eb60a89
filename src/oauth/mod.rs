//! The server side of the Google OAuth authorization-code handshake.
//!
//! The service keeps no session: after a successful exchange the access token is handed
//! to the frontend in the redirect URL and comes back as a bearer credential.

mod client;

pub use client::{CallbackParams, OAuthClient, OAuthError};
