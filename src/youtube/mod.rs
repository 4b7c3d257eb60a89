//! Live channel and video metadata from the YouTube Data API.

mod client;

pub use client::{VideoProvider, YouTubeClient};
