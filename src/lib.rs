//! creator-scout: discover small-to-mid-size video creators by keyword.
//!
//! Searches the YouTube Data API v3 for videos matching a keyword, filters
//! by audience and engagement thresholds, aggregates the survivors into
//! per-channel records with derived metrics (median views, publish cadence,
//! composite score), merges results across repeated searches, and exports
//! to JSONL.
//!
//! Entry point: [`pipeline::search_creators`] for one keyword, or
//! [`pipeline::SessionResults`] to accumulate across keywords.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod sorting;
pub mod utils;

pub use aggregation::{aggregate_channels, merge_channels, write_channels_to_jsonl};
pub use error::{ConfigError, SearchError};
pub use models::{
    ChannelRecord, ChannelStats, EnrichedVideo, FilteredVideo, LatestVideo, VideoCandidate,
    VideoStats,
};
pub use pipeline::{search_creators, SearchParams, SessionResults};
pub use services::cache::CachedPlatform;
pub use services::youtube::{VideoPlatform, YouTubeService};
pub use sorting::{sort_channels, SortBy};
