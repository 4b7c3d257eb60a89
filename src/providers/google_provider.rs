use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{models::user::User, providers::Provider};

/// Config for validating Google access tokens against the OAuth2 user-info endpoint.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct GoogleProviderConfig {
    pub name: String,
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
}

fn default_userinfo_url() -> String {
    "https://www.googleapis.com/oauth2/v2/userinfo".to_string()
}

/// The subset of the user-info document we read.
#[derive(Deserialize, Debug)]
struct UserInfo {
    id: Option<String>,
    name: Option<String>,
}

/// A provider that asks Google who a token belongs to.
///
/// Every call is a round trip to Google: nothing is cached, so a revoked token stops
/// working on the next request.
pub struct GoogleProvider {
    config: GoogleProviderConfig,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(config: &GoogleProviderConfig) -> Self {
        info!(
            "Creating GoogleProvider '{}' against {}",
            config.name, config.userinfo_url
        );
        Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Provider for GoogleProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn authenticate(&self, token: &str) -> Result<User, String> {
        debug!("Sending user-info request to: {}", self.config.userinfo_url);
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| format!("Error sending request: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("User-info rejected token: {}", response.status()));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| format!("Error parsing user-info JSON: {}", e))?;

        match info.id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(User::new(id, info.name, self.config.name.clone())),
            None => Err("User-info response has no 'id'".to_string()),
        }
    }
}
