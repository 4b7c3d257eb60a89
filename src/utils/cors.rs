//! Cross-origin handling.
//!
//! Preflight requests are answered before routing, so they never reach the
//! authentication gate. Every other response gets the same CORS headers stamped on.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::CorsConfig;

const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type,Authorization,X-YouTube-Channel-Id";

/// Pre-rendered CORS header values.
#[derive(Clone, Debug)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    wildcard: bool,
}

impl CorsHeaders {
    pub fn new(config: &CorsConfig) -> Result<Self, String> {
        let origin = config.allowed_origin.trim();
        let allow_origin = HeaderValue::from_str(origin)
            .map_err(|e| format!("Invalid cors.allowed_origin '{}': {}", origin, e))?;
        Ok(CorsHeaders {
            allow_origin,
            wildcard: origin == "*",
        })
    }

    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        if !self.wildcard {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
}

/// Middleware: answers any OPTIONS request with an empty 200, and adds CORS headers to
/// everything else.
pub async fn cors(State(cors): State<CorsHeaders>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        cors.apply(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    cors.apply(response.headers_mut());
    response
}
