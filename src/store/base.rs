use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{memory_store::MemoryStore, mongodb_store::MongoDBStore};
use crate::config::StoreConfig;
use crate::models::{AbTest, ChannelSelection};

/// The Store trait abstracts persistence of channel selections and tests.
///
/// Every query is scoped by the caller's user id; there is no per-record ownership check.
#[async_trait]
pub trait Store: Send + Sync {
    /// The channel the user last selected, if they ever selected one.
    async fn get_selected_channel(&self, user_id: &str) -> Result<Option<String>, String>;
    /// Overwrites the user's selection unconditionally.
    async fn save_selection(&self, selection: &ChannelSelection) -> Result<(), String>;
    /// Tests owned by `user_id` for `channel_id`, newest first. Empty when there are none.
    async fn list_tests(&self, user_id: &str, channel_id: &str) -> Result<Vec<AbTest>, String>;
    /// Writes a test. No duplicate detection.
    async fn create_test(&self, test: &AbTest) -> Result<(), String>;
}

/// Creates a concrete store implementation based on the StoreConfig.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn Store>, String> {
    match config {
        StoreConfig::Memory => {
            info!("Using in-memory store; data is lost on restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreConfig::MongoDB(mongo_config) => {
            let store = MongoDBStore::new(mongo_config)
                .await
                .map_err(|e| format!("Failed to create MongoDB store: {}", e))?;
            info!("Successfully created MongoDB store.");
            Ok(Arc::new(store))
        }
    }
}

/// Newest first; ties keep insertion order.
pub(crate) fn sort_newest_first(tests: &mut [AbTest]) {
    tests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
