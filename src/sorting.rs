//! Ranking of accumulated channel results.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::ChannelRecord;

/// Sort keys for channel results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    /// Discovery order, as returned by the search.
    Relevance,
    MedianViews,
    Subscribers,
    /// Most recent upload first; channels with no known upload date last.
    Activity,
}

/// Display label / sort key pairs for the surrounding application.
pub const SORT_OPTIONS: &[(&str, SortBy)] = &[
    ("Relevance", SortBy::Relevance),
    ("Median Views", SortBy::MedianViews),
    ("Subscribers", SortBy::Subscribers),
    ("Most Recent", SortBy::Activity),
];

/// Order channel records by the chosen key, descending. Sorting is stable:
/// equal keys keep their discovery order.
pub fn sort_channels(channels: &HashMap<String, ChannelRecord>, sort_by: SortBy) -> Vec<ChannelRecord> {
    let mut list: Vec<ChannelRecord> = channels.values().cloned().collect();
    // Baseline relevance order before any stable key sort.
    list.sort_by_key(|c| c.discovery_rank);

    match sort_by {
        SortBy::Relevance => {}
        SortBy::MedianViews => list.sort_by_key(|c| Reverse(c.median_views)),
        SortBy::Subscribers => list.sort_by_key(|c| Reverse(c.subscriber_count)),
        // Option<DateTime> orders None first ascending, so reversing puts
        // undated channels last.
        SortBy::Activity => list.sort_by(|a, b| b.last_published.cmp(&a.last_published)),
    }

    list
}
