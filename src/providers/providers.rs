use super::{
    google_provider::{GoogleProvider, GoogleProviderConfig},
    static_provider::{StaticProvider, StaticProviderConfig},
};
use crate::models::user::User;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configuration options for each token validation provider.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "google")]
    Google(GoogleProviderConfig),
    #[serde(rename = "static")]
    Static(StaticProviderConfig),
}

/// A provider turns a bearer token into a `User`, or explains why it could not.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    fn get_name(&self) -> &str;
    async fn authenticate(&self, token: &str) -> Result<User, String>;
}

/// Create a token validation provider from a given config.
pub fn create_auth_provider(config: &ProviderConfig) -> Box<dyn Provider> {
    match config {
        ProviderConfig::Google(cfg) => Box::new(GoogleProvider::new(cfg)),
        ProviderConfig::Static(cfg) => Box::new(StaticProvider::new(cfg)),
    }
}
