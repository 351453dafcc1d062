//! Folding filtered videos into per-channel records, merging result sets
//! across repeated searches, and the flat JSONL export.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{info, warn};
use serde_json::json;

use crate::metrics::{calculate_average_views, recompute_channel_metrics};
use crate::models::{ChannelRecord, ChannelStats, EnrichedVideo, FilteredVideo};

/// Fold filtered videos into one record per channel, tagging each video
/// with the keyword that surfaced it, then derive every channel metric.
///
/// Videos whose channel has no stats entry are skipped; a record cannot be
/// built without channel metadata. Video insertion order is discovery
/// order.
pub fn aggregate_channels(
    videos: &[FilteredVideo],
    channel_stats: &HashMap<String, ChannelStats>,
    keyword: &str,
) -> HashMap<String, ChannelRecord> {
    let mut channels: HashMap<String, ChannelRecord> = HashMap::new();

    for video in videos {
        let stats = match channel_stats.get(&video.channel_id) {
            Some(s) => s,
            None => continue,
        };

        let rank = channels.len();
        let record = channels
            .entry(video.channel_id.clone())
            .or_insert_with(|| {
                ChannelRecord::from_stats(&video.channel_id, &video.channel_name, stats, rank)
            });

        // Tag the video with the keyword only if no earlier video in this
        // record already carries it. Linear scan; quadratic per channel,
        // fine at <= 1000 videos per search.
        let already_tagged = record
            .videos
            .iter()
            .any(|v| v.keywords.iter().any(|k| k == keyword));

        record.videos.push(EnrichedVideo {
            title: video.title.clone(),
            url: video.url(),
            views: video.views,
            published_at: video.published_at,
            likes: video.likes,
            comment_count: video.comment_count,
            duration_seconds: video.duration_seconds,
            keywords: if already_tagged {
                Vec::new()
            } else {
                vec![keyword.to_string()]
            },
        });
    }

    for record in channels.values_mut() {
        recompute_channel_metrics(record);
    }

    channels
}

/// Merge an incoming result set into an existing one.
///
/// Unseen channels are inserted wholesale, ranked after everything already
/// present (incoming relative order preserved). For channels present on
/// both sides, videos are unioned by URL: a duplicate video contributes
/// only its new keyword tags; unseen videos are appended in incoming
/// order.
///
/// Derived metrics are NOT recomputed here; callers that need fresh
/// metrics after merging re-run `recompute_channel_metrics` per record,
/// as [`SessionResults`](crate::pipeline::SessionResults) does.
pub fn merge_channels(
    existing: HashMap<String, ChannelRecord>,
    incoming: HashMap<String, ChannelRecord>,
) -> HashMap<String, ChannelRecord> {
    let mut merged = existing;

    let next_rank = merged
        .values()
        .map(|r| r.discovery_rank + 1)
        .max()
        .unwrap_or(0);

    // Incoming insertion order is carried on the records themselves.
    let mut incoming: Vec<ChannelRecord> = incoming.into_values().collect();
    incoming.sort_by_key(|r| r.discovery_rank);

    for mut record in incoming {
        match merged.entry(record.channel_id.clone()) {
            Entry::Occupied(mut slot) => {
                let existing_record = slot.get_mut();
                for new_video in record.videos.drain(..) {
                    let position = existing_record
                        .videos
                        .iter()
                        .position(|v| v.url == new_video.url);
                    match position {
                        Some(i) => {
                            let existing_video = &mut existing_record.videos[i];
                            for keyword in new_video.keywords {
                                if !existing_video.keywords.contains(&keyword) {
                                    existing_video.keywords.push(keyword);
                                }
                            }
                        }
                        None => existing_record.videos.push(new_video),
                    }
                }
            }
            Entry::Vacant(slot) => {
                record.discovery_rank += next_rank;
                slot.insert(record);
            }
        }
    }

    merged
}

/// Write one JSON object per channel, one per line. UTF-8, non-ASCII
/// preserved unescaped.
pub fn write_channels_to_jsonl<P: AsRef<Path>>(
    channels: &HashMap<String, ChannelRecord>,
    output_file: P,
) -> io::Result<()> {
    let path = output_file.as_ref();
    let result = (|| {
        let mut writer = BufWriter::new(File::create(path)?);

        for record in channels.values() {
            let avg_views = calculate_average_views(record);
            let row = json!({
                "channel_name": record.channel_name,
                "channel_id": record.channel_id,
                "channel_url": record.channel_url,
                "subscriber_count": record.subscriber_count,
                "total_videos": record.total_videos,
                "average_views": (avg_views * 10.0).round() / 10.0,
                "videos": record.videos,
            });
            writer.write_all(row.to_string().as_bytes())?;
            writer.write_all(b"\n")?;
        }

        writer.flush()
    })();

    match result {
        Ok(()) => {
            info!("Results saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn!("Error writing to {}: {e}", path.display());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn filtered_video(video_id: &str, channel_id: &str, views: u64) -> FilteredVideo {
        FilteredVideo {
            video_id: video_id.to_string(),
            title: format!("video {video_id}"),
            channel_id: channel_id.to_string(),
            channel_name: format!("channel {channel_id}"),
            views,
            published_at: None,
            likes: 10,
            comment_count: 2,
            duration_seconds: 300,
        }
    }

    fn stats_for(channel_ids: &[&str]) -> HashMap<String, ChannelStats> {
        channel_ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    ChannelStats {
                        subscriber_count: 1000,
                        video_count: 20,
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn aggregates_videos_under_their_channel() {
        let videos = vec![
            filtered_video("a", "c1", 100),
            filtered_video("b", "c1", 200),
            filtered_video("c", "c2", 300),
        ];
        let channels = aggregate_channels(&videos, &stats_for(&["c1", "c2"]), "rust");

        assert_eq!(channels.len(), 2);
        assert_eq!(channels["c1"].videos.len(), 2);
        assert_eq!(channels["c2"].videos.len(), 1);
        assert_eq!(channels["c1"].median_views, 150);
    }

    #[test]
    fn skips_channels_without_stats() {
        let videos = vec![filtered_video("a", "c1", 100), filtered_video("b", "ghost", 200)];
        let channels = aggregate_channels(&videos, &stats_for(&["c1"]), "rust");

        assert_eq!(channels.len(), 1);
        assert!(!channels.contains_key("ghost"));
    }

    #[test]
    fn keyword_tagged_once_per_channel() {
        let videos = vec![filtered_video("a", "c1", 100), filtered_video("b", "c1", 200)];
        let channels = aggregate_channels(&videos, &stats_for(&["c1"]), "rust");

        let tagged: usize = channels["c1"]
            .videos
            .iter()
            .filter(|v| v.keywords.contains(&"rust".to_string()))
            .count();
        assert_eq!(tagged, 1);
    }

    #[test]
    fn discovery_rank_follows_first_sighting() {
        let videos = vec![
            filtered_video("a", "c2", 100),
            filtered_video("b", "c1", 200),
            filtered_video("c", "c2", 300),
        ];
        let channels = aggregate_channels(&videos, &stats_for(&["c1", "c2"]), "rust");

        assert_eq!(channels["c2"].discovery_rank, 0);
        assert_eq!(channels["c1"].discovery_rank, 1);
    }

    #[test]
    fn merge_into_empty_inserts_everything() {
        let videos = vec![filtered_video("a", "c1", 100)];
        let incoming = aggregate_channels(&videos, &stats_for(&["c1"]), "rust");
        let merged = merge_channels(HashMap::new(), incoming.clone());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged["c1"].videos.len(), 1);
    }

    #[test]
    fn merge_is_idempotent() {
        let videos = vec![filtered_video("a", "c1", 100), filtered_video("b", "c1", 200)];
        let set = aggregate_channels(&videos, &stats_for(&["c1"]), "rust");

        let merged = merge_channels(set.clone(), set.clone());
        assert_eq!(merged["c1"].videos.len(), 2);
        for video in &merged["c1"].videos {
            let unique: std::collections::HashSet<&String> = video.keywords.iter().collect();
            assert_eq!(unique.len(), video.keywords.len());
        }
    }

    #[test]
    fn merge_unions_keywords_for_shared_video() {
        let videos = vec![filtered_video("a", "c1", 100)];
        let stats = stats_for(&["c1"]);
        let from_a = aggregate_channels(&videos, &stats, "a");
        let from_b = aggregate_channels(&videos, &stats, "b");

        let merged = merge_channels(from_a, from_b);
        assert_eq!(merged["c1"].videos.len(), 1);
        assert_eq!(merged["c1"].videos[0].keywords, vec!["a", "b"]);
    }

    #[test]
    fn merge_grouping_does_not_change_video_or_keyword_sets() {
        let stats = stats_for(&["c1", "c2"]);
        let a = aggregate_channels(&[filtered_video("v1", "c1", 100)], &stats, "a");
        let b = aggregate_channels(
            &[filtered_video("v1", "c1", 100), filtered_video("v2", "c2", 200)],
            &stats,
            "b",
        );
        let c = aggregate_channels(&[filtered_video("v2", "c2", 200)], &stats, "c");

        let left = merge_channels(merge_channels(a.clone(), b.clone()), c.clone());
        let right = merge_channels(a, merge_channels(b, c));

        assert_eq!(left.len(), right.len());
        for (channel_id, record) in &left {
            let other = &right[channel_id];
            assert_eq!(record.videos.len(), other.videos.len());
            for video in &record.videos {
                let twin = other.videos.iter().find(|v| v.url == video.url).unwrap();
                let mut ours = video.keywords.clone();
                let mut theirs = twin.keywords.clone();
                ours.sort();
                theirs.sort();
                assert_eq!(ours, theirs);
            }
        }
    }

    #[test]
    fn merge_appends_new_channels_after_existing_ranks() {
        let stats = stats_for(&["c1", "c2"]);
        let first = aggregate_channels(&[filtered_video("v1", "c1", 100)], &stats, "a");
        let second = aggregate_channels(&[filtered_video("v2", "c2", 200)], &stats, "b");

        let merged = merge_channels(first, second);
        assert!(merged["c1"].discovery_rank < merged["c2"].discovery_rank);
    }

    #[test]
    fn jsonl_export_writes_one_line_per_channel() {
        let videos = vec![
            filtered_video("a", "c1", 100),
            filtered_video("b", "c1", 201),
            filtered_video("c", "c2", 300),
        ];
        let channels = aggregate_channels(&videos, &stats_for(&["c1", "c2"]), "rüst");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creators.jsonl");
        write_channels_to_jsonl(&channels, &path).unwrap();

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        // Non-ASCII keywords survive unescaped, averages round to one decimal.
        assert!(contents.contains("rüst"));
        let parsed: Vec<serde_json::Value> = lines
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let c1 = parsed
            .iter()
            .find(|v| v["channel_id"] == "c1")
            .unwrap();
        assert_eq!(c1["average_views"], 150.5);
        assert_eq!(c1["videos"].as_array().unwrap().len(), 2);
    }
}
