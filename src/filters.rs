//! Pure filter predicates over video and channel sets. Inclusive range
//! checks throughout; an item with no stats entry is unknown, not zero, and
//! is silently dropped. An empty result is a valid result.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::models::{ChannelRecord, ChannelStats, FilteredVideo, VideoCandidate, VideoStats};

/// Keep videos whose view count falls within `min_views..=max_views`,
/// annotating each survivor with its engagement fields.
pub fn filter_videos_by_views(
    videos: &[VideoCandidate],
    stats: &HashMap<String, VideoStats>,
    min_views: u64,
    max_views: u64,
) -> Vec<FilteredVideo> {
    let mut filtered = Vec::new();
    for video in videos {
        let video_stats = match stats.get(&video.video_id) {
            Some(s) => s,
            None => continue,
        };

        if (min_views..=max_views).contains(&video_stats.view_count) {
            filtered.push(FilteredVideo {
                video_id: video.video_id.clone(),
                title: video.title.clone(),
                channel_id: video.channel_id.clone(),
                channel_name: video.channel_name.clone(),
                views: video_stats.view_count,
                published_at: video_stats.published_at,
                likes: video_stats.like_count,
                comment_count: video_stats.comment_count,
                duration_seconds: video_stats.duration_seconds,
            });
        }
    }
    filtered
}

/// Keep channel ids whose subscriber count falls within the range.
pub fn filter_channels_by_subscribers(
    channel_ids: &[String],
    stats: &HashMap<String, ChannelStats>,
    min_subscribers: u64,
    max_subscribers: u64,
) -> Vec<String> {
    channel_ids
        .iter()
        .filter(|id| {
            stats
                .get(*id)
                .map(|s| (min_subscribers..=max_subscribers).contains(&s.subscriber_count))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Keep channel ids whose total upload count falls within the range.
pub fn filter_channels_by_video_count(
    channel_ids: &[String],
    stats: &HashMap<String, ChannelStats>,
    min_videos: u64,
    max_videos: u64,
) -> Vec<String> {
    channel_ids
        .iter()
        .filter(|id| {
            stats
                .get(*id)
                .map(|s| (min_videos..=max_videos).contains(&s.video_count))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Keep channels whose most recent upload is within the trailing window.
/// A channel with no known last-published date cannot prove recency and is
/// excluded.
pub fn filter_channels_by_activity(
    channels: HashMap<String, ChannelRecord>,
    max_days_since_publish: i64,
) -> HashMap<String, ChannelRecord> {
    let cutoff = Utc::now() - Duration::days(max_days_since_publish);

    channels
        .into_iter()
        .filter(|(_, record)| {
            record
                .last_published
                .map(|lp| lp >= cutoff)
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(video_id: &str, channel_id: &str) -> VideoCandidate {
        VideoCandidate {
            video_id: video_id.to_string(),
            title: format!("video {video_id}"),
            channel_id: channel_id.to_string(),
            channel_name: format!("channel {channel_id}"),
        }
    }

    fn stats(views: u64) -> VideoStats {
        VideoStats {
            view_count: views,
            ..Default::default()
        }
    }

    #[test]
    fn view_filter_is_inclusive_on_both_bounds() {
        let videos = vec![
            candidate("a", "c1"),
            candidate("b", "c1"),
            candidate("c", "c2"),
            candidate("d", "c2"),
        ];
        let mut view_stats = HashMap::new();
        view_stats.insert("a".to_string(), stats(99));
        view_stats.insert("b".to_string(), stats(100));
        view_stats.insert("c".to_string(), stats(1000));
        view_stats.insert("d".to_string(), stats(1001));

        let filtered = filter_videos_by_views(&videos, &view_stats, 100, 1000);
        let ids: Vec<&str> = filtered.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn video_without_stats_entry_is_dropped() {
        let videos = vec![candidate("a", "c1"), candidate("b", "c1")];
        let mut view_stats = HashMap::new();
        view_stats.insert("a".to_string(), stats(500));

        let filtered = filter_videos_by_views(&videos, &view_stats, 0, 1_000_000);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].video_id, "a");
    }

    #[test]
    fn view_filter_annotates_engagement_fields() {
        let videos = vec![candidate("a", "c1")];
        let mut view_stats = HashMap::new();
        view_stats.insert(
            "a".to_string(),
            VideoStats {
                view_count: 500,
                published_at: None,
                like_count: 42,
                comment_count: 7,
                duration_seconds: 300,
            },
        );

        let filtered = filter_videos_by_views(&videos, &view_stats, 100, 1000);
        assert_eq!(filtered[0].likes, 42);
        assert_eq!(filtered[0].comment_count, 7);
        assert_eq!(filtered[0].duration_seconds, 300);
    }

    #[test]
    fn subscriber_filter_drops_missing_and_out_of_range() {
        let ids = vec!["c1".to_string(), "c2".to_string(), "c3".to_string()];
        let mut channel_stats = HashMap::new();
        channel_stats.insert(
            "c1".to_string(),
            ChannelStats {
                subscriber_count: 5000,
                ..Default::default()
            },
        );
        channel_stats.insert(
            "c2".to_string(),
            ChannelStats {
                subscriber_count: 50,
                ..Default::default()
            },
        );

        let kept = filter_channels_by_subscribers(&ids, &channel_stats, 100, 10_000);
        assert_eq!(kept, vec!["c1".to_string()]);
    }

    #[test]
    fn video_count_filter() {
        let ids = vec!["c1".to_string(), "c2".to_string()];
        let mut channel_stats = HashMap::new();
        channel_stats.insert(
            "c1".to_string(),
            ChannelStats {
                video_count: 10,
                ..Default::default()
            },
        );
        channel_stats.insert(
            "c2".to_string(),
            ChannelStats {
                video_count: 500,
                ..Default::default()
            },
        );

        let kept = filter_channels_by_video_count(&ids, &channel_stats, 5, 100);
        assert_eq!(kept, vec!["c1".to_string()]);
    }

    #[test]
    fn activity_filter_keeps_recent_and_drops_undated() {
        let mut channels = HashMap::new();

        let mut recent = ChannelRecord::from_stats("c1", "recent", &ChannelStats::default(), 0);
        recent.last_published = Some(Utc::now() - Duration::days(5));
        channels.insert("c1".to_string(), recent);

        let mut stale = ChannelRecord::from_stats("c2", "stale", &ChannelStats::default(), 1);
        stale.last_published = Some(Utc::now() - Duration::days(90));
        channels.insert("c2".to_string(), stale);

        let undated = ChannelRecord::from_stats("c3", "undated", &ChannelStats::default(), 2);
        channels.insert("c3".to_string(), undated);

        let active = filter_channels_by_activity(channels, 30);
        assert_eq!(active.len(), 1);
        assert!(active.contains_key("c1"));
    }
}
