use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions, ReplaceOptions};
use mongodb::{Client, Collection, IndexModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::sort_newest_first;
use crate::models::{AbTest, ChannelSelection};
use crate::store::Store;

/// The config struct for MongoDB connections.
/// Contains the URI and database name.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct MongoDBConfig {
    pub uri: String,
    pub database: String,
}

/// A concrete `Store` implementation that uses MongoDB.
///
/// - `users`: one selection record per user id
/// - `tests`: test records, indexed for per-user-per-channel queries
pub struct MongoDBStore {
    user_collection: Collection<ChannelSelection>,
    test_collection: Collection<AbTest>,
}

fn user_filter(user_id: &str) -> Document {
    doc! { "userId": user_id }
}

fn tests_filter(user_id: &str, channel_id: &str) -> Document {
    doc! { "userId": user_id, "channelId": channel_id }
}

impl MongoDBStore {
    /// Creates a new `MongoDBStore` from the given config.
    /// It initializes client connections, sets up indexes, etc.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, String> {
        info!("Connecting to MongoDB database '{}'", config.database);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| format!("Failed to parse MongoDB URI: {}", e))?;
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| format!("Failed to create MongoDB client: {}", e))?;

        let database = client.database(&config.database);
        let user_collection = database.collection::<ChannelSelection>("users");
        let test_collection = database.collection::<AbTest>("tests");

        // 1) One selection record per user
        let mut unique_on_user_id = IndexModel::default();
        unique_on_user_id.keys = doc! { "userId": 1 };
        unique_on_user_id.options = Some(IndexOptions::builder().unique(true).build());
        user_collection
            .create_index(unique_on_user_id, None)
            .await
            .map_err(|e| format!("Failed to create unique index on userId: {}", e))?;

        // 2) Unique test ids
        let mut unique_on_test_id = IndexModel::default();
        unique_on_test_id.keys = doc! { "testId": 1 };
        unique_on_test_id.options = Some(IndexOptions::builder().unique(true).build());
        test_collection
            .create_index(unique_on_test_id, None)
            .await
            .map_err(|e| format!("Failed to create unique index on testId: {}", e))?;

        // 3) The per-user-per-channel listing index
        let mut user_channel = IndexModel::default();
        user_channel.keys = doc! { "userId": 1, "channelId": 1, "createdAt": -1 };
        test_collection
            .create_index(user_channel, None)
            .await
            .map_err(|e| format!("Failed to create index on (userId, channelId): {}", e))?;

        info!("MongoDB connection established successfully.");
        Ok(Self {
            user_collection,
            test_collection,
        })
    }
}

#[async_trait]
impl Store for MongoDBStore {
    async fn get_selected_channel(&self, user_id: &str) -> Result<Option<String>, String> {
        let selection = self
            .user_collection
            .find_one(user_filter(user_id), None)
            .await
            .map_err(|e| format!("Failed to query user selection: {}", e))?;
        Ok(selection.and_then(|s| s.selected_channel_id))
    }

    async fn save_selection(&self, selection: &ChannelSelection) -> Result<(), String> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.user_collection
            .replace_one(user_filter(&selection.user_id), selection, options)
            .await
            .map_err(|e| format!("Failed to save channel selection: {}", e))?;
        debug!("Saved channel selection for user '{}'", selection.user_id);
        Ok(())
    }

    async fn list_tests(&self, user_id: &str, channel_id: &str) -> Result<Vec<AbTest>, String> {
        let mut cursor = self
            .test_collection
            .find(tests_filter(user_id, channel_id), None)
            .await
            .map_err(|e| format!("Failed to list tests: {}", e))?;

        let mut tests = Vec::new();
        while let Some(test) = cursor
            .try_next()
            .await
            .map_err(|e| format!("Failed to read test document: {}", e))?
        {
            tests.push(test);
        }
        sort_newest_first(&mut tests);
        Ok(tests)
    }

    async fn create_test(&self, test: &AbTest) -> Result<(), String> {
        self.test_collection
            .insert_one(test, None)
            .await
            .map_err(|e| format!("Failed to insert test: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTest;
    use mongodb::bson::{self, Bson};

    #[test]
    fn test_filters_match_index_fields() {
        assert_eq!(user_filter("u1"), doc! { "userId": "u1" });
        assert_eq!(
            tests_filter("u1", "UC1"),
            doc! { "userId": "u1", "channelId": "UC1" }
        );
    }

    /// The stored document uses the same camelCase keys the indexes are built on.
    #[test]
    fn test_test_document_keys() {
        let test = AbTest::create(
            "u1",
            "UC1",
            NewTest {
                video_id: Some("v1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let document = bson::to_document(&test).unwrap();
        assert_eq!(document.get_str("testId").unwrap(), test.test_id);
        assert_eq!(document.get_str("userId").unwrap(), "u1");
        assert_eq!(document.get_str("channelId").unwrap(), "UC1");
        assert_eq!(document.get_str("status").unwrap(), "active");
    }

    /// Counters written as doubles by another client still load as integers.
    #[test]
    fn test_double_counters_decode_as_integers() {
        let test = AbTest::create(
            "u1",
            "UC1",
            NewTest {
                video_id: Some("v1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let mut document = bson::to_document(&test).unwrap();
        document.insert(
            "metrics",
            doc! {
                "variantA": { "views": Bson::Double(7.0), "clicks": Bson::Int32(2) },
                "variantB": { "views": Bson::Int64(0), "clicks": Bson::Double(0.0) },
            },
        );

        let decoded: AbTest = bson::from_document(document).unwrap();
        let metrics = decoded.metrics.unwrap();
        assert_eq!(metrics.variant_a.views, 7);
        assert_eq!(metrics.variant_a.clicks, 2);
        assert_eq!(metrics.variant_b.clicks, 0);
    }
}
