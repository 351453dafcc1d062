//! High-level search orchestration: one parameterized pipeline tying the
//! gateway, filters, aggregator and merger together.
//!
//! Stages run strictly in sequence: Search, FetchVideoStats,
//! FilterByViews, FetchChannelStats, optional FilterByVideoCount,
//! FilterBySubscribers, Aggregate, Merge, optional FilterByActivity. A
//! stage that yields zero usable items aborts with a typed
//! [`SearchError`]; nothing partial comes back on those paths.

use std::collections::{HashMap, HashSet};

use log::info;

use crate::aggregation::{aggregate_channels, merge_channels};
use crate::config::MAX_RESULTS_PER_KEYWORD;
use crate::error::SearchError;
use crate::filters::{
    filter_channels_by_activity, filter_channels_by_subscribers, filter_channels_by_video_count,
    filter_videos_by_views,
};
use crate::metrics::recompute_channel_metrics;
use crate::models::ChannelRecord;
use crate::services::youtube::VideoPlatform;

/// Inputs for a single pipeline run. Optional ranges gate their stage
/// entirely: `None` passes the input through unchanged.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub keyword: String,
    pub view_range: (u64, u64),
    pub subscriber_range: (u64, u64),
    pub video_count_range: Option<(u64, u64)>,
    pub activity_days: Option<i64>,
    /// Total search results to collect before filtering.
    pub max_results: usize,
}

impl SearchParams {
    pub fn new(keyword: impl Into<String>, view_range: (u64, u64), subscriber_range: (u64, u64)) -> Self {
        SearchParams {
            keyword: keyword.into(),
            view_range,
            subscriber_range,
            video_count_range: None,
            activity_days: None,
            max_results: MAX_RESULTS_PER_KEYWORD,
        }
    }

    pub fn with_video_count_range(mut self, range: (u64, u64)) -> Self {
        self.video_count_range = Some(range);
        self
    }

    pub fn with_activity_days(mut self, days: i64) -> Self {
        self.activity_days = Some(days);
        self
    }
}

/// Execute the full creator search pipeline for one keyword.
///
/// Progress messages are emitted through `on_progress` around each stage;
/// pass `|_| {}` to ignore them.
pub async fn search_creators<P: VideoPlatform + ?Sized>(
    platform: &P,
    params: &SearchParams,
    mut on_progress: impl FnMut(&str),
) -> Result<HashMap<String, ChannelRecord>, SearchError> {
    let (min_views, max_views) = params.view_range;
    let (min_subs, max_subs) = params.subscriber_range;
    let keyword = params.keyword.as_str();

    on_progress("Searching for videos...");
    let videos = platform.search_videos(keyword, params.max_results).await;
    if videos.is_empty() {
        return Err(SearchError::NoVideosFound {
            keyword: keyword.to_string(),
        });
    }
    on_progress(&format!("Found {} videos", videos.len()));

    on_progress("Fetching video statistics...");
    let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
    let video_stats = platform.get_video_statistics(&video_ids).await;

    on_progress("Filtering by view count...");
    let filtered_videos = filter_videos_by_views(&videos, &video_stats, min_views, max_views);
    if filtered_videos.is_empty() {
        return Err(SearchError::NoViewMatches {
            min_views,
            max_views,
        });
    }
    on_progress(&format!(
        "{} videos match view criteria",
        filtered_videos.len()
    ));

    on_progress("Fetching channel statistics...");
    let channel_ids: Vec<String> = {
        let unique: HashSet<String> = filtered_videos
            .iter()
            .map(|v| v.channel_id.clone())
            .collect();
        unique.into_iter().collect()
    };
    let channel_stats = platform.get_channel_statistics(&channel_ids).await;

    let channel_ids = match params.video_count_range {
        Some((min_videos, max_videos)) => {
            on_progress("Filtering by video count...");
            let kept =
                filter_channels_by_video_count(&channel_ids, &channel_stats, min_videos, max_videos);
            if kept.is_empty() {
                return Err(SearchError::NoVideoCountMatches);
            }
            kept
        }
        None => channel_ids,
    };

    on_progress("Filtering by subscribers...");
    let valid_channel_ids: HashSet<String> =
        filter_channels_by_subscribers(&channel_ids, &channel_stats, min_subs, max_subs)
            .into_iter()
            .collect();
    let filtered_videos: Vec<_> = filtered_videos
        .into_iter()
        .filter(|v| valid_channel_ids.contains(&v.channel_id))
        .collect();
    if filtered_videos.is_empty() {
        return Err(SearchError::NoSubscriberMatches);
    }

    on_progress("Aggregating results...");
    let keyword_channels = aggregate_channels(&filtered_videos, &channel_stats, keyword);
    let mut all_channels = merge_channels(HashMap::new(), keyword_channels);

    if let Some(days) = params.activity_days {
        on_progress(&format!("Filtering by activity (last {days} days)..."));
        all_channels = filter_channels_by_activity(all_channels, days);
    }

    on_progress(&format!("Found {} creators", all_channels.len()));
    info!(
        "Pipeline finished for '{keyword}': {} creators",
        all_channels.len()
    );

    Ok(all_channels)
}

/// Owner of the result set accumulated across repeated searches within one
/// caller session. Single-writer; one pipeline run at a time.
#[derive(Debug, Default)]
pub struct SessionResults {
    channels: HashMap<String, ChannelRecord>,
}

impl SessionResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pipeline for one keyword and merge the outcome into the
    /// accumulated set. Metrics are re-derived after the merge, so records
    /// whose video lists grew are never left stale.
    pub async fn run<P: VideoPlatform + ?Sized>(
        &mut self,
        platform: &P,
        params: &SearchParams,
        on_progress: impl FnMut(&str),
    ) -> Result<usize, SearchError> {
        let found = search_creators(platform, params, on_progress).await?;
        self.channels = merge_channels(std::mem::take(&mut self.channels), found);
        for record in self.channels.values_mut() {
            recompute_channel_metrics(record);
        }
        Ok(self.channels.len())
    }

    pub fn channels(&self) -> &HashMap<String, ChannelRecord> {
        &self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Drop everything accumulated so far; the next run starts fresh.
    pub fn clear(&mut self) {
        self.channels.clear();
    }
}
