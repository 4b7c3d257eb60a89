use serde::{Deserialize, Serialize};

/// A YouTube channel owned by the authenticated principal. Fetched live, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    /// YouTube reports statistics as decimal strings; kept verbatim.
    pub subscriber_count: String,
    pub video_count: String,
}
