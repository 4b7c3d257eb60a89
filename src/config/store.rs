use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::mongodb_store::MongoDBConfig;

/// The existing store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// Process-local maps; contents are lost on restart.
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "mongo")]
    MongoDB(MongoDBConfig),
}
