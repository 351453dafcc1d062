//! Per-channel derived statistics: medians, averages, publish cadence, and
//! the composite channel score. All pure functions over a channel's video
//! list; an empty list yields zeros, never an error.
//!
//! Median is used instead of average wherever engagement is judged, so a
//! single viral outlier cannot skew a channel's profile.

use chrono::{DateTime, Utc};

use crate::models::ChannelRecord;

fn median(mut values: Vec<u64>) -> u64 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2
    } else {
        values[mid]
    }
}

pub fn calculate_median_views(channel: &ChannelRecord) -> u64 {
    median(channel.videos.iter().map(|v| v.views).collect())
}

pub fn calculate_average_views(channel: &ChannelRecord) -> f64 {
    if channel.videos.is_empty() {
        return 0.0;
    }
    let total: u64 = channel.videos.iter().map(|v| v.views).sum();
    total as f64 / channel.videos.len() as f64
}

pub fn calculate_median_likes(channel: &ChannelRecord) -> u64 {
    median(channel.videos.iter().map(|v| v.likes).collect())
}

pub fn calculate_median_comments(channel: &ChannelRecord) -> u64 {
    median(channel.videos.iter().map(|v| v.comment_count).collect())
}

/// Average video duration in seconds, over videos with a known duration.
pub fn calculate_avg_duration(channel: &ChannelRecord) -> u64 {
    let durations: Vec<u64> = channel
        .videos
        .iter()
        .map(|v| v.duration_seconds)
        .filter(|&d| d > 0)
        .collect();

    if durations.is_empty() {
        return 0;
    }
    durations.iter().sum::<u64>() / durations.len() as u64
}

/// Mean days between consecutive uploads. Requires at least two dated
/// videos, otherwise the cadence is unknowable.
pub fn calculate_publish_interval(channel: &ChannelRecord) -> Option<f64> {
    let mut dates: Vec<DateTime<Utc>> = channel
        .videos
        .iter()
        .filter_map(|v| v.published_at)
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    if dates.len() < 2 {
        return None;
    }

    let intervals: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect();
    Some(intervals.iter().sum::<i64>() as f64 / intervals.len() as f64)
}

/// Most recent publish date across the channel's videos.
pub fn get_last_published(channel: &ChannelRecord) -> Option<DateTime<Utc>> {
    channel.videos.iter().filter_map(|v| v.published_at).max()
}

/// Map a publish interval onto a fixed set of human-readable buckets.
pub fn format_publish_interval(days: Option<f64>) -> &'static str {
    let days = match days {
        Some(d) => d,
        None => return "N/A",
    };

    if days < 1.0 {
        "Multiple per day"
    } else if days < 2.0 {
        "Daily"
    } else if days < 4.0 {
        "Every few days"
    } else if days < 8.0 {
        "Weekly"
    } else if days < 15.0 {
        "Every 2 weeks"
    } else if days < 22.0 {
        "Every 3 weeks"
    } else if days < 45.0 {
        "Monthly"
    } else if days < 75.0 {
        "Every 2 months"
    } else {
        "Infrequent"
    }
}

/// Median views relative to subscriber count, as a percentage. Zero
/// subscribers yields 0 rather than dividing.
pub fn calculate_views_to_subs_ratio(channel: &ChannelRecord) -> f64 {
    if channel.subscriber_count == 0 {
        return 0.0;
    }
    (channel.median_views as f64 / channel.subscriber_count as f64) * 100.0
}

pub fn get_views_to_subs_label(ratio: f64) -> &'static str {
    if ratio < 5.0 {
        "Poor"
    } else if ratio < 10.0 {
        "Below Average"
    } else if ratio < 20.0 {
        "Average"
    } else if ratio < 50.0 {
        "Good"
    } else {
        "Excellent"
    }
}

/// Composite channel score, 0-100.
///
/// Weighted blend: 30% activity (publish frequency), 35% content
/// performance (views-to-subs ratio), 35% engagement (likes and comments
/// relative to views, judged against 4% like and 0.5% comment reference
/// points). The thresholds are tuning constants; changing them changes
/// every score downstream.
pub fn calculate_channel_score(channel: &ChannelRecord) -> u32 {
    let activity_score: f64 = match channel.publish_interval_days {
        None => 30.0,
        Some(d) if d > 60.0 => 30.0,
        Some(d) if d > 30.0 => 50.0,
        Some(d) if d > 14.0 => 70.0,
        Some(d) if d > 7.0 => 85.0,
        Some(_) => 100.0,
    };

    let views_to_subs = calculate_views_to_subs_ratio(channel);
    let perf_score: f64 = if views_to_subs < 2.0 {
        20.0
    } else if views_to_subs < 5.0 {
        40.0
    } else if views_to_subs < 10.0 {
        60.0
    } else if views_to_subs < 20.0 {
        80.0
    } else {
        100.0
    };

    let (like_ratio, comment_ratio) = if channel.median_views > 0 {
        (
            channel.median_likes as f64 / channel.median_views as f64 * 100.0,
            channel.median_comments as f64 / channel.median_views as f64 * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    let like_score = (like_ratio / 4.0 * 100.0).min(100.0);
    let comment_score = (comment_ratio / 0.5 * 100.0).min(100.0);
    let engagement_score = like_score * 0.7 + comment_score * 0.3;

    let total = activity_score * 0.30 + perf_score * 0.35 + engagement_score * 0.35;

    total.round() as u32
}

pub fn get_score_label(score: u32) -> &'static str {
    if score >= 80 {
        "Excellent"
    } else if score >= 60 {
        "Good"
    } else if score >= 40 {
        "Average"
    } else {
        "Poor"
    }
}

/// Recompute every derived metric from the current video list, in
/// dependency order (ratio and score read the medians). Run this after any
/// mutation of `videos`; stale metrics are never trusted after a merge.
pub fn recompute_channel_metrics(channel: &mut ChannelRecord) {
    channel.median_views = calculate_median_views(channel);
    channel.average_views = calculate_average_views(channel);
    channel.median_likes = calculate_median_likes(channel);
    channel.median_comments = calculate_median_comments(channel);
    channel.avg_duration = calculate_avg_duration(channel);
    channel.publish_interval_days = calculate_publish_interval(channel);
    channel.last_published = get_last_published(channel);
    channel.views_to_subs_ratio = calculate_views_to_subs_ratio(channel);
    channel.channel_score = calculate_channel_score(channel);
}
