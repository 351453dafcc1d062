//! YouTube Data API v3 gateway.
//!
//! Thin client over the read-only list endpoints: search, video statistics,
//! channel statistics, and playlist items. Owns pagination and batching but
//! no business logic. Well-formed remote rejections (quota, not-found,
//! transport) are logged and downgraded to empty or partial results; the
//! caller decides whether that is good enough.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;

use crate::config::{BATCH_SIZE, PAGE_SIZE, REQUEST_DELAY_MS};
use crate::error::ConfigError;
use crate::models::{ChannelStats, LatestVideo, VideoCandidate, VideoStats};
use crate::utils::{parse_iso8601_duration, parse_rfc3339};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// The remote operations the pipeline consumes. Implemented by
/// [`YouTubeService`] and by the memoizing wrapper in
/// [`cache`](crate::services::cache); tests substitute an in-memory stub.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Search for videos matching a keyword, paginating until
    /// `max_total_results` collected or the result pages run out. Best
    /// effort: a remote error mid-pagination returns what was collected.
    async fn search_videos(&self, keyword: &str, max_total_results: usize) -> Vec<VideoCandidate>;

    /// Fetch statistics for videos, batched. Ids from a failed batch are
    /// simply absent from the result.
    async fn get_video_statistics(&self, video_ids: &[String]) -> HashMap<String, VideoStats>;

    /// Fetch statistics for channels, batched like video statistics.
    async fn get_channel_statistics(&self, channel_ids: &[String]) -> HashMap<String, ChannelStats>;

    /// Fetch the newest entries of a channel's uploads playlist, with a
    /// statistics pass over the returned ids. Display-only; not part of
    /// the filter pipeline.
    async fn get_channel_latest_videos(
        &self,
        uploads_playlist_id: &str,
        max_results: usize,
    ) -> Vec<LatestVideo>;
}

/// Service client for the YouTube Data API v3.
pub struct YouTubeService {
    client: Client,
    api_key: String,
}

impl YouTubeService {
    /// Initialize the client. An empty API key fails fast here; remote
    /// rejection of a wrong key surfaces later as degraded results.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        info!("YouTube service initialized");
        Ok(YouTubeService {
            client: Client::new(),
            api_key,
        })
    }

    async fn fetch_json(&self, endpoint: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
        let url = format!("{API_BASE}/{endpoint}");
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(response)
    }

    fn parse_video_item(item: &Value) -> (String, VideoStats) {
        let video_id = item["id"].as_str().unwrap_or("").to_string();
        let statistics = &item["statistics"];

        // Documentation: https://developers.google.com/youtube/v3/docs/videos
        // Counters come back as JSON strings.
        let stats = VideoStats {
            view_count: statistics["viewCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            like_count: statistics["likeCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            comment_count: statistics["commentCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            published_at: parse_rfc3339(item["snippet"]["publishedAt"].as_str().unwrap_or("")),
            duration_seconds: parse_iso8601_duration(
                item["contentDetails"]["duration"].as_str().unwrap_or(""),
            ),
        };
        (video_id, stats)
    }

    fn parse_channel_item(item: &Value) -> (String, ChannelStats) {
        let channel_id = item["id"].as_str().unwrap_or("").to_string();
        let snippet = &item["snippet"];
        let statistics = &item["statistics"];

        let stats = ChannelStats {
            subscriber_count: statistics["subscriberCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            video_count: statistics["videoCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            total_view_count: statistics["viewCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            custom_url: snippet["customUrl"].as_str().unwrap_or("").to_string(),
            country: snippet["country"].as_str().unwrap_or("").to_string(),
            created_at: parse_rfc3339(snippet["publishedAt"].as_str().unwrap_or("")),
            thumbnail_url: snippet["thumbnails"]["medium"]["url"]
                .as_str()
                .unwrap_or("")
                .to_string(),
            uploads_playlist_id: item["contentDetails"]["relatedPlaylists"]["uploads"]
                .as_str()
                .unwrap_or("")
                .to_string(),
            description: snippet["description"].as_str().unwrap_or("").to_string(),
        };
        (channel_id, stats)
    }
}

#[async_trait]
impl VideoPlatform for YouTubeService {
    async fn search_videos(&self, keyword: &str, max_total_results: usize) -> Vec<VideoCandidate> {
        let mut all_videos = Vec::new();
        let mut page_token: Option<String> = None;

        while all_videos.len() < max_total_results {
            let page_size = PAGE_SIZE.min(max_total_results - all_videos.len());
            let page_size = page_size.to_string();
            let mut query = vec![
                ("q", keyword),
                ("part", "id,snippet"),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.as_str()));
            }

            let response = match self.fetch_json("search", &query).await {
                Ok(r) => r,
                Err(e) => {
                    // Best effort: keep whatever earlier pages returned.
                    warn!("Error searching for '{keyword}': {e:?}");
                    break;
                }
            };

            let items = response["items"].as_array().cloned().unwrap_or_default();
            debug!("Search page returned {} items", items.len());
            for item in &items {
                if all_videos.len() >= max_total_results {
                    break;
                }
                let video_id = item["id"]["videoId"].as_str().unwrap_or("");
                if video_id.is_empty() {
                    continue;
                }
                all_videos.push(VideoCandidate {
                    video_id: video_id.to_string(),
                    title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
                    channel_id: item["snippet"]["channelId"]
                        .as_str()
                        .unwrap_or("")
                        .to_string(),
                    channel_name: item["snippet"]["channelTitle"]
                        .as_str()
                        .unwrap_or("")
                        .to_string(),
                });
            }

            page_token = response["nextPageToken"].as_str().map(str::to_string);
            if page_token.is_none() {
                break;
            }

            // Be respectful with API calls.
            sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;
        }

        info!("Found {} videos for keyword '{keyword}'", all_videos.len());
        all_videos
    }

    async fn get_video_statistics(&self, video_ids: &[String]) -> HashMap<String, VideoStats> {
        let mut stats = HashMap::new();

        for batch in video_ids.chunks(BATCH_SIZE) {
            let ids = batch.join(",");
            let query = [
                ("part", "statistics,snippet,contentDetails"),
                ("id", ids.as_str()),
            ];

            match self.fetch_json("videos", &query).await {
                Ok(response) => {
                    let items = response["items"].as_array().cloned().unwrap_or_default();
                    for item in &items {
                        let (video_id, video_stats) = Self::parse_video_item(item);
                        if !video_id.is_empty() {
                            stats.insert(video_id, video_stats);
                        }
                    }
                }
                Err(e) => {
                    // Drop only this batch's ids, not the whole call.
                    warn!("Error fetching video statistics: {e:?}");
                }
            }

            sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;
        }

        stats
    }

    async fn get_channel_statistics(&self, channel_ids: &[String]) -> HashMap<String, ChannelStats> {
        let mut stats = HashMap::new();

        for batch in channel_ids.chunks(BATCH_SIZE) {
            let ids = batch.join(",");
            let query = [
                ("part", "statistics,snippet,contentDetails"),
                ("id", ids.as_str()),
            ];

            match self.fetch_json("channels", &query).await {
                Ok(response) => {
                    let items = response["items"].as_array().cloned().unwrap_or_default();
                    for item in &items {
                        let (channel_id, channel_stats) = Self::parse_channel_item(item);
                        if !channel_id.is_empty() {
                            stats.insert(channel_id, channel_stats);
                        }
                    }
                }
                Err(e) => {
                    warn!("Error fetching channel statistics: {e:?}");
                }
            }

            sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;
        }

        stats
    }

    async fn get_channel_latest_videos(
        &self,
        uploads_playlist_id: &str,
        max_results: usize,
    ) -> Vec<LatestVideo> {
        if uploads_playlist_id.is_empty() {
            return Vec::new();
        }

        let max = max_results.to_string();
        let query = [
            ("part", "snippet"),
            ("playlistId", uploads_playlist_id),
            ("maxResults", max.as_str()),
        ];

        let response = match self.fetch_json("playlistItems", &query).await {
            Ok(r) => r,
            Err(e) => {
                warn!("Error fetching playlist videos: {e:?}");
                return Vec::new();
            }
        };

        let mut video_ids = Vec::new();
        let mut titles: HashMap<String, (String, Option<chrono::DateTime<chrono::Utc>>)> =
            HashMap::new();

        let items = response["items"].as_array().cloned().unwrap_or_default();
        for item in &items {
            let snippet = &item["snippet"];
            let video_id = snippet["resourceId"]["videoId"].as_str().unwrap_or("");
            if video_id.is_empty() {
                continue;
            }
            video_ids.push(video_id.to_string());
            titles.insert(
                video_id.to_string(),
                (
                    snippet["title"].as_str().unwrap_or("").to_string(),
                    parse_rfc3339(snippet["publishedAt"].as_str().unwrap_or("")),
                ),
            );
        }

        if video_ids.is_empty() {
            return Vec::new();
        }

        let stats = self.get_video_statistics(&video_ids).await;

        video_ids
            .into_iter()
            .map(|video_id| {
                let (title, playlist_published) =
                    titles.remove(&video_id).unwrap_or_default();
                let video_stats = stats.get(&video_id).cloned().unwrap_or_default();
                LatestVideo {
                    url: format!("youtube.com/watch?v={video_id}"),
                    video_id,
                    title,
                    views: video_stats.view_count,
                    published_at: playlist_published.or(video_stats.published_at),
                }
            })
            .collect()
    }
}
