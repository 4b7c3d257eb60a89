use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user record: which channel a user last picked as active.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSelection {
    pub user_id: String,
    pub selected_channel_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ChannelSelection {
    /// Stamps a new selection with the current time.
    pub fn new(user_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        ChannelSelection {
            user_id: user_id.into(),
            selected_channel_id: Some(channel_id.into()),
            updated_at: Utc::now(),
        }
    }
}
