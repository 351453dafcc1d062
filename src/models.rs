use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video surfaced by keyword search. Search results carry no statistics;
/// those are fetched in a second pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_name: String,
}

/// Per-video statistics, keyed by video id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoStats {
    pub view_count: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
}

/// Per-channel statistics, keyed by channel id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelStats {
    pub subscriber_count: u64,
    pub video_count: u64,
    pub total_view_count: u64,
    pub custom_url: String,
    pub country: String,
    pub created_at: Option<DateTime<Utc>>,
    pub thumbnail_url: String,
    pub uploads_playlist_id: String,
    pub description: String,
}

/// A search candidate annotated with its statistics. Produced by the view
/// filter, consumed by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredVideo {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_name: String,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
}

/// A video folded into a channel record, tagged with the search keywords
/// that surfaced it. A given video URL appears at most once per result set;
/// the keyword list only grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedVideo {
    pub title: String,
    pub url: String,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
    pub keywords: Vec<String>,
}

/// One entry from a channel's uploads playlist, used for the single-channel
/// latest-activity view only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestVideo {
    pub video_id: String,
    pub title: String,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

/// One record per discovered channel: identity, channel statistics, the
/// videos that surfaced it, and metrics derived from those videos.
///
/// Derived metrics are only meaningful after
/// [`recompute_channel_metrics`](crate::metrics::recompute_channel_metrics)
/// has run against the current `videos` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel_name: String,
    pub channel_id: String,
    pub channel_url: String,
    pub subscriber_count: u64,
    pub total_videos: u64,
    pub total_channel_views: u64,
    pub custom_url: String,
    pub country: String,
    pub created_at: Option<DateTime<Utc>>,
    pub thumbnail_url: String,
    pub uploads_playlist_id: String,
    pub description: String,
    pub videos: Vec<EnrichedVideo>,

    // Derived metrics, recomputed from `videos`.
    pub median_views: u64,
    pub average_views: f64,
    pub median_likes: u64,
    pub median_comments: u64,
    pub avg_duration: u64,
    pub publish_interval_days: Option<f64>,
    pub last_published: Option<DateTime<Utc>>,
    pub views_to_subs_ratio: f64,
    pub channel_score: u32,

    /// Position of this channel's first sighting across the accumulated
    /// result set. Result sets live in a `HashMap`, so relevance ordering
    /// is carried on the record itself.
    #[serde(skip)]
    pub discovery_rank: usize,
}

impl ChannelRecord {
    /// Materialize a record from channel statistics with an empty video
    /// list and zeroed metrics.
    pub fn from_stats(
        channel_id: &str,
        channel_name: &str,
        stats: &ChannelStats,
        discovery_rank: usize,
    ) -> Self {
        ChannelRecord {
            channel_name: channel_name.to_string(),
            channel_id: channel_id.to_string(),
            channel_url: format!("youtube.com/channel/{channel_id}"),
            subscriber_count: stats.subscriber_count,
            total_videos: stats.video_count,
            total_channel_views: stats.total_view_count,
            custom_url: stats.custom_url.clone(),
            country: stats.country.clone(),
            created_at: stats.created_at,
            thumbnail_url: stats.thumbnail_url.clone(),
            uploads_playlist_id: stats.uploads_playlist_id.clone(),
            description: stats.description.clone(),
            videos: Vec::new(),
            median_views: 0,
            average_views: 0.0,
            median_likes: 0,
            median_comments: 0,
            avg_duration: 0,
            publish_interval_days: None,
            last_published: None,
            views_to_subs_ratio: 0.0,
            channel_score: 0,
            discovery_rank,
        }
    }
}

impl FilteredVideo {
    /// The canonical watch URL, which doubles as the video's identity when
    /// merging result sets.
    pub fn url(&self) -> String {
        format!("youtube.com/watch?v={}", self.video_id)
    }
}
