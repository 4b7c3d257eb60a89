use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::providers::ProviderConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ABTUBE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub providers: Vec<ProviderConfig>,
    pub store: StoreConfig,
}

impl ConfigV1 {
    /// Parses a configuration from a YAML document. Environment overrides are not applied.
    pub fn from_yaml(yaml: &str) -> Result<ConfigV1, figment::Error> {
        let config: Config = Figment::new().merge(Yaml::string(yaml)).extract()?;
        match config {
            Config::ConfigV1(c) => Ok(c),
        }
    }
}

/// Load config from the YAML file (`./config.yaml` unless `ABTUBE_CONFIG` says otherwise),
/// with `ABTUBE_`-prefixed environment variables layered on top.
pub fn load_config() -> ConfigV1 {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let figment = Figment::new()
        .merge(Yaml::file(&path))
        .merge(Env::prefixed("ABTUBE_").ignore(&["config"]).split("__"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration from '{}': {}", path, e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to render configuration schema: {}", e),
    }
}

/// Google OAuth client registration and endpoints.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Where Google sends the browser back to; must point at this service's callback route.
    pub redirect_uri: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_scopes() -> Vec<String> {
    [
        "openid",
        "email",
        "profile",
        "https://www.googleapis.com/auth/youtube.readonly",
        "https://www.googleapis.com/auth/youtube.force-ssl",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// YouTube Data API settings.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct YouTubeConfig {
    #[serde(default = "default_youtube_api_url")]
    pub api_url: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        YouTubeConfig {
            api_url: default_youtube_api_url(),
            max_results: default_max_results(),
        }
    }
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_max_results() -> u32 {
    20
}

/// How the access token is packed into the frontend redirect.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenEncoding {
    /// URL-safe base64 with padding.
    #[default]
    Base64,
    /// Lower-case hex of the token bytes.
    Hex,
}

/// The single-page frontend the OAuth handshake returns to.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FrontendConfig {
    pub url: String,
    #[serde(default)]
    pub token_encoding: TokenEncoding,
}

/// Cross-origin policy: either "*" or one exact origin.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    const MINIMAL: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:8080
logging:
  level: info
  format: console
google:
  client_id: client
  client_secret: secret
  redirect_uri: http://localhost:8080/callback
frontend:
  url: http://localhost:5173
providers:
  - type: google
    name: google
store:
  type: memory
"#;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config = ConfigV1::from_yaml(MINIMAL).expect("config should parse");
        assert_eq!(config.google.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(config.google.scopes.len(), 5);
        assert_eq!(config.youtube.max_results, 20);
        assert_eq!(config.cors.allowed_origin, "*");
        assert_eq!(config.frontend.token_encoding, TokenEncoding::Base64);
        assert!(matches!(config.store, StoreConfig::Memory));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let yaml = MINIMAL.replace("1.0.0", "2.0.0");
        assert!(ConfigV1::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_hex_token_encoding() {
        let yaml = MINIMAL.replace(
            "  url: http://localhost:5173",
            "  url: http://localhost:5173\n  token_encoding: hex",
        );
        let config = ConfigV1::from_yaml(&yaml).expect("config should parse");
        assert_eq!(config.frontend.token_encoding, TokenEncoding::Hex);
    }
}
