use base64::{engine::general_purpose, Engine as _};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{FrontendConfig, GoogleConfig, TokenEncoding};

/// Ways the callback leg can fail. Each one ends in a redirect, never an HTTP error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// Google redirected back with `?error=...` (e.g. the user denied consent).
    #[error("provider reported '{0}'")]
    Provider(String),
    #[error("callback carried no authorization code")]
    MissingCode,
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("token response carried no access token")]
    MissingAccessToken,
}

impl OAuthError {
    /// The value put in the frontend's `error` query parameter.
    pub fn code(&self) -> &str {
        match self {
            OAuthError::Provider(error) => error,
            OAuthError::MissingCode => "no_code",
            OAuthError::TokenExchange(_) => "token_exchange_failed",
            OAuthError::MissingAccessToken => "no_access_token",
        }
    }
}

/// Query parameters Google appends to the redirect URI.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Builds the authorization redirect, exchanges codes, and computes where the browser
/// goes back to.
pub struct OAuthClient {
    google: GoogleConfig,
    auth_url: Url,
    frontend_url: Url,
    token_encoding: TokenEncoding,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(google: &GoogleConfig, frontend: &FrontendConfig) -> Result<Self, String> {
        let auth_url = Url::parse(&google.auth_url)
            .map_err(|e| format!("Invalid google.auth_url '{}': {}", google.auth_url, e))?;
        let frontend_url = Url::parse(&frontend.url)
            .map_err(|e| format!("Invalid frontend.url '{}': {}", frontend.url, e))?;
        info!(
            "OAuth client '{}' redirects back to {}",
            google.client_id, frontend_url
        );
        Ok(OAuthClient {
            google: google.clone(),
            auth_url,
            frontend_url,
            token_encoding: frontend.token_encoding,
            http: reqwest::Client::new(),
        })
    }

    /// The Google consent-screen URL the login route redirects to.
    pub fn authorization_url(&self) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.google.client_id)
            .append_pair("redirect_uri", &self.google.redirect_uri)
            .append_pair("scope", &self.google.scopes.join(" "))
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline");
        url.into()
    }

    /// Trades an authorization code for an access token at the token endpoint.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        debug!("Exchanging authorization code at {}", self.google.token_url);
        let form = [
            ("code", code),
            ("client_id", self.google.client_id.as_str()),
            ("client_secret", self.google.client_secret.as_str()),
            ("redirect_uri", self.google.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self
            .http
            .post(&self.google.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("Error sending request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthError::TokenExchange(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("Error parsing token JSON: {}", e)))?;

        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or(OAuthError::MissingAccessToken)
    }

    /// Packs the token for transport in a query parameter.
    pub fn encode_token(&self, token: &str) -> String {
        match self.token_encoding {
            TokenEncoding::Base64 => general_purpose::URL_SAFE.encode(token),
            TokenEncoding::Hex => hex::encode(token),
        }
    }

    /// Runs the callback leg and returns the frontend URL to redirect to.
    pub async fn complete(&self, params: CallbackParams) -> String {
        match self.finish_handshake(params).await {
            Ok(token) => {
                info!("OAuth handshake completed");
                self.success_redirect(&token)
            }
            Err(e) => {
                warn!(error = %e, "OAuth handshake failed");
                self.error_redirect(&e)
            }
        }
    }

    async fn finish_handshake(&self, params: CallbackParams) -> Result<String, OAuthError> {
        if let Some(error) = params.error.filter(|e| !e.is_empty()) {
            return Err(OAuthError::Provider(error));
        }
        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or(OAuthError::MissingCode)?;
        self.exchange_code(&code).await
    }

    pub fn success_redirect(&self, token: &str) -> String {
        let mut url = self.frontend_url.clone();
        url.query_pairs_mut()
            .append_pair("success", "true")
            .append_pair("token", &self.encode_token(token));
        url.into()
    }

    pub fn error_redirect(&self, error: &OAuthError) -> String {
        let mut url = self.frontend_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("error", error.code());
            if let OAuthError::TokenExchange(reason) = error {
                pairs.append_pair("reason", reason);
            }
        }
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn google_config(token_url: String) -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "https://api.example.com/callback".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_url,
            scopes: vec!["profile".to_string(), "https://www.googleapis.com/auth/youtube.readonly".to_string()],
        }
    }

    fn frontend(token_encoding: TokenEncoding) -> FrontendConfig {
        FrontendConfig {
            url: "https://app.example.com/".to_string(),
            token_encoding,
        }
    }

    fn query_of(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_authorization_url_carries_fixed_parameters() {
        let client = OAuthClient::new(
            &google_config("https://oauth2.googleapis.com/token".into()),
            &frontend(TokenEncoding::Base64),
        )
        .unwrap();

        let url = client.authorization_url();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        let query = query_of(&url);
        assert!(query.contains(&("client_id".into(), "client-123".into())));
        assert!(query.contains(&("redirect_uri".into(), "https://api.example.com/callback".into())));
        assert!(query.contains(&(
            "scope".into(),
            "profile https://www.googleapis.com/auth/youtube.readonly".into()
        )));
        assert!(query.contains(&("response_type".into(), "code".into())));
        assert!(query.contains(&("access_type".into(), "offline".into())));
    }

    #[test]
    fn test_token_encodings() {
        let google = google_config("https://oauth2.googleapis.com/token".into());
        let b64 = OAuthClient::new(&google, &frontend(TokenEncoding::Base64)).unwrap();
        let hex = OAuthClient::new(&google, &frontend(TokenEncoding::Hex)).unwrap();

        assert_eq!(b64.encode_token("ya29.a?b"), "eWEyOS5hP2I=");
        assert_eq!(hex.encode_token("ya29"), "79613239");
    }

    #[test]
    fn test_invalid_frontend_url_is_rejected() {
        let google = google_config("https://oauth2.googleapis.com/token".into());
        let bad = FrontendConfig {
            url: "not a url".to_string(),
            token_encoding: TokenEncoding::Base64,
        };
        assert!(OAuthClient::new(&google, &bad).is_err());
    }

    #[tokio::test]
    async fn test_provider_error_is_forwarded_without_exchange() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/token")
            .expect(0)
            .create_async()
            .await;
        let client = OAuthClient::new(
            &google_config(format!("{}/token", server.url())),
            &frontend(TokenEncoding::Base64),
        )
        .unwrap();

        let location = client
            .complete(CallbackParams {
                code: Some("abc".into()),
                error: Some("access_denied".into()),
            })
            .await;

        token_mock.assert_async().await;
        assert_eq!(query_of(&location), vec![("error".into(), "access_denied".into())]);
    }

    #[tokio::test]
    async fn test_missing_code() {
        let client = OAuthClient::new(
            &google_config("http://127.0.0.1:9/token".into()),
            &frontend(TokenEncoding::Base64),
        )
        .unwrap();
        let location = client.complete(CallbackParams::default()).await;
        assert_eq!(location, "https://app.example.com/?error=no_code");
    }

    #[tokio::test]
    async fn test_successful_exchange_redirects_with_encoded_token() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded("client_id".into(), "client-123".into()),
                Matcher::UrlEncoded("client_secret".into(), "shh".into()),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "ya29", "expires_in": 3599}"#)
            .create_async()
            .await;
        let client = OAuthClient::new(
            &google_config(format!("{}/token", server.url())),
            &frontend(TokenEncoding::Hex),
        )
        .unwrap();

        let location = client
            .complete(CallbackParams {
                code: Some("auth-code".into()),
                error: None,
            })
            .await;

        token_mock.assert_async().await;
        assert_eq!(
            location,
            "https://app.example.com/?success=true&token=79613239"
        );
    }

    #[tokio::test]
    async fn test_failed_exchange_redirects_with_reason() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;
        let client = OAuthClient::new(
            &google_config(format!("{}/token", server.url())),
            &frontend(TokenEncoding::Base64),
        )
        .unwrap();

        let location = client
            .complete(CallbackParams {
                code: Some("expired".into()),
                error: None,
            })
            .await;

        token_mock.assert_async().await;
        let query = query_of(&location);
        assert_eq!(query[0], ("error".into(), "token_exchange_failed".into()));
        assert_eq!(query[1].0, "reason");
        assert!(query[1].1.contains("400"));
    }

    #[tokio::test]
    async fn test_response_without_access_token() {
        let mut server = Server::new_async().await;
        let _token_mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id_token": "only-id"}"#)
            .create_async()
            .await;
        let client = OAuthClient::new(
            &google_config(format!("{}/token", server.url())),
            &frontend(TokenEncoding::Base64),
        )
        .unwrap();

        let result = client.exchange_code("code").await;
        assert_eq!(result.unwrap_err(), OAuthError::MissingAccessToken);
    }
}
