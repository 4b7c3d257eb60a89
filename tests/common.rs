#![allow(dead_code)]

use std::sync::Arc;

use abtube::config::ConfigV1;
use abtube::routes::create_router;
use abtube::startup::build_state;
use abtube::store::Store;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

/// Accepted by the static provider as `user-1`.
pub const GOOD_TOKEN: &str = "good-token";
pub const USER_ID: &str = "user-1";
/// Accepted by the static provider as `user-2`.
pub const OTHER_TOKEN: &str = "other-token";

pub const FRONTEND_URL: &str = "https://app.example.com/";

/// A full configuration whose Google and YouTube endpoints point at `server_url`.
pub fn test_config(server_url: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
bind_address: 127.0.0.1:0
logging:
  level: debug
  format: json
google:
  client_id: test-client
  client_secret: test-secret
  redirect_uri: http://localhost:8080/callback
  token_url: {server}/token
youtube:
  api_url: {server}/youtube/v3
  max_results: 5
frontend:
  url: {frontend}
providers:
  - type: static
    name: dev
    users:
      - token: {good}
        user_id: {user}
        name: Ada
      - token: {other}
        user_id: user-2
  - type: google
    name: google
    userinfo_url: {server}/oauth2/v2/userinfo
store:
  type: memory
"#,
        server = server_url,
        frontend = FRONTEND_URL,
        good = GOOD_TOKEN,
        user = USER_ID,
        other = OTHER_TOKEN,
    );
    ConfigV1::from_yaml(&yaml).expect("test config should parse")
}

pub async fn build_app(config: ConfigV1) -> Router {
    let state = build_state(Arc::new(config))
        .await
        .expect("state should build");
    create_router(state)
}

/// Same as `build_app`, with the configured store replaced by `store`.
pub async fn build_app_with_store(config: ConfigV1, store: Arc<dyn Store>) -> Router {
    let mut state = build_state(Arc::new(config))
        .await
        .expect("state should build");
    state.store = store;
    create_router(state)
}

/// Builds a request with optional bearer token, channel header and JSON body.
pub fn request(
    method: Method,
    path: &str,
    token: Option<&str>,
    channel: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(channel) = channel {
        builder = builder.header("X-YouTube-Channel-Id", channel);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("failed to build request")
}

pub fn get(path: &str, token: Option<&str>, channel: Option<&str>) -> Request<Body> {
    request(Method::GET, path, token, channel, None)
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header missing")
        .to_str()
        .expect("Location header not valid UTF-8")
        .to_string()
}
