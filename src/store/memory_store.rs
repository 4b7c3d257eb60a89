use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::base::sort_newest_first;
use super::Store;
use crate::models::{AbTest, ChannelSelection};

/// A process-local store, used for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    selections: RwLock<HashMap<String, ChannelSelection>>,
    tests: RwLock<Vec<AbTest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_selected_channel(&self, user_id: &str) -> Result<Option<String>, String> {
        Ok(self
            .selections
            .read()
            .await
            .get(user_id)
            .and_then(|s| s.selected_channel_id.clone()))
    }

    async fn save_selection(&self, selection: &ChannelSelection) -> Result<(), String> {
        self.selections
            .write()
            .await
            .insert(selection.user_id.clone(), selection.clone());
        Ok(())
    }

    async fn list_tests(&self, user_id: &str, channel_id: &str) -> Result<Vec<AbTest>, String> {
        let mut tests: Vec<AbTest> = self
            .tests
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id && t.channel_id.as_deref() == Some(channel_id))
            .cloned()
            .collect();
        sort_newest_first(&mut tests);
        Ok(tests)
    }

    async fn create_test(&self, test: &AbTest) -> Result<(), String> {
        self.tests.write().await.push(test.clone());
        Ok(())
    }
}
