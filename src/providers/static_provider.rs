use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::User;
use crate::providers::Provider;

/// StaticProviderConfig maps fixed bearer tokens to user ids, for local development
/// without a Google project.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct StaticProviderConfig {
    /// A friendly name for logs.
    pub name: String,
    pub users: Vec<StaticUserEntry>,
}

#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct StaticUserEntry {
    pub token: String,
    pub user_id: String,
    pub name: Option<String>,
}

pub struct StaticProvider {
    pub config: StaticProviderConfig,
}

impl StaticProvider {
    pub fn new(config: &StaticProviderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn authenticate(&self, token: &str) -> Result<User, String> {
        debug!("Static token lookup in '{}'", self.config.name);
        self.config
            .users
            .iter()
            .find(|entry| entry.token == token)
            .map(|entry| {
                User::new(
                    entry.user_id.clone(),
                    entry.name.clone(),
                    self.config.name.clone(),
                )
            })
            .ok_or_else(|| "Unknown token".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> StaticProviderConfig {
        StaticProviderConfig {
            name: "dev".to_string(),
            users: vec![
                StaticUserEntry {
                    token: "alice-token".to_string(),
                    user_id: "alice".to_string(),
                    name: Some("Alice".to_string()),
                },
                StaticUserEntry {
                    token: "bob-token".to_string(),
                    user_id: "bob".to_string(),
                    name: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_known_token_resolves_user() {
        let provider = StaticProvider::new(&create_test_config());
        let user = provider.authenticate("bob-token").await.unwrap();
        assert_eq!(user.id, "bob");
        assert_eq!(user.provider, "dev");
        assert!(user.name.is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let provider = StaticProvider::new(&create_test_config());
        let result = provider.authenticate("mallory-token").await;
        assert_eq!(result.unwrap_err(), "Unknown token");
    }
}
