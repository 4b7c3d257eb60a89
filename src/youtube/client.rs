use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::YouTubeConfig;
use crate::models::{Channel, Video};

/// Source of channel and video metadata, called with the end user's access token.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Channels owned by the token's principal.
    async fn list_channels(&self, access_token: &str) -> Result<Vec<Channel>, String>;
    /// Most recent videos of a channel, newest first.
    async fn list_videos(&self, access_token: &str, channel_id: &str) -> Result<Vec<Video>, String>;
}

// Wire shapes of the Data API v3 responses; only the fields we map are declared.

#[derive(Deserialize, Debug)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize, Debug, Default)]
struct Thumbnail {
    url: String,
}

#[derive(Deserialize, Debug, Default)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Medium first: the size the video picker renders.
    fn pick_medium(self) -> Option<String> {
        self.medium.or(self.high).or(self.default).map(|t| t.url)
    }

    fn pick_small(self) -> Option<String> {
        self.default.or(self.medium).or(self.high).map(|t| t.url)
    }
}

#[derive(Deserialize, Debug)]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    video_count: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: ChannelStatistics,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    id: SearchId,
    snippet: VideoSnippet,
}

impl From<ChannelItem> for Channel {
    fn from(item: ChannelItem) -> Self {
        Channel {
            id: item.id,
            title: item.snippet.title,
            thumbnail: item.snippet.thumbnails.pick_small(),
            subscriber_count: item
                .statistics
                .subscriber_count
                .unwrap_or_else(|| "0".to_string()),
            video_count: item
                .statistics
                .video_count
                .unwrap_or_else(|| "0".to_string()),
        }
    }
}

/// Client for `https://www.googleapis.com/youtube/v3`.
pub struct YouTubeClient {
    api_url: String,
    max_results: u32,
    http: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Self {
        info!(
            "Creating YouTube client for {} (max_results={})",
            config.api_url, config.max_results
        );
        YouTubeClient {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
            http: reqwest::Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        access_token: &str,
        query: &[(&str, &str)],
    ) -> Result<ListResponse<T>, String> {
        let url = format!("{}/{}", self.api_url, resource);
        debug!("Sending YouTube request to: {}", url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("Error sending request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("YouTube API returned {}: {}", status, body.trim()));
        }

        response
            .json::<ListResponse<T>>()
            .await
            .map_err(|e| format!("Error parsing YouTube response: {}", e))
    }
}

#[async_trait]
impl VideoProvider for YouTubeClient {
    async fn list_channels(&self, access_token: &str) -> Result<Vec<Channel>, String> {
        let response: ListResponse<ChannelItem> = self
            .get(
                "channels",
                access_token,
                &[("part", "snippet,statistics"), ("mine", "true")],
            )
            .await?;
        Ok(response.items.into_iter().map(Channel::from).collect())
    }

    async fn list_videos(&self, access_token: &str, channel_id: &str) -> Result<Vec<Video>, String> {
        let max_results = self.max_results.to_string();
        let response: ListResponse<SearchItem> = self
            .get(
                "search",
                access_token,
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("type", "video"),
                    ("order", "date"),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        // Search results can include items without a video id; those are not videos we can test.
        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id?;
                Some(Video {
                    id,
                    title: item.snippet.title,
                    thumbnail: item.snippet.thumbnails.pick_medium(),
                    published_at: item.snippet.published_at,
                })
            })
            .collect())
    }
}
