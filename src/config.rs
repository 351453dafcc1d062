//! Central configuration: tunable constants, filter presets, and the
//! logging/environment bootstrap helpers.

use env_logger::Builder;
use log::LevelFilter;
use std::env;

/// Total results collected per keyword before pagination stops.
pub const MAX_RESULTS_PER_KEYWORD: usize = 1000;
/// Maximum ids per batched statistics request (platform limit).
pub const BATCH_SIZE: usize = 50;
/// Maximum results per search page (platform limit).
pub const PAGE_SIZE: usize = 50;
/// Courtesy delay between successive remote pages/batches.
pub const REQUEST_DELAY_MS: u64 = 100;

pub const OUTPUT_FILE: &str = "creators.jsonl";

// Default filter ranges.
pub const MIN_VIEWS: u64 = 100;
pub const MAX_VIEWS: u64 = 1000;
pub const MIN_SUBSCRIBERS: u64 = 100;
pub const MAX_SUBSCRIBERS: u64 = 10_000;
pub const MIN_CHANNEL_VIDEOS: u64 = 5;
pub const MAX_CHANNEL_VIDEOS: u64 = 100;

/// Named view-count ranges offered to the surrounding application.
pub const VIEW_PRESETS: &[(&str, (u64, u64))] = &[
    ("Any", (0, 10_000_000)),
    ("< 1K", (0, 1_000)),
    ("1K - 10K", (1_000, 10_000)),
    ("10K - 100K", (10_000, 100_000)),
    ("100K+", (100_000, 10_000_000)),
];

pub const SUBSCRIBER_PRESETS: &[(&str, (u64, u64))] = &[
    ("Any", (0, 100_000_000)),
    ("< 1K", (0, 1_000)),
    ("1K - 10K", (1_000, 10_000)),
    ("10K - 100K", (10_000, 100_000)),
    ("100K - 1M", (100_000, 1_000_000)),
    ("1M+", (1_000_000, 100_000_000)),
];

pub const ACTIVITY_PRESETS: &[(&str, Option<i64>)] = &[
    ("Any", None),
    ("Active (30 days)", Some(30)),
    ("Active (90 days)", Some(90)),
    ("Active (1 year)", Some(365)),
];

pub fn init_logger() {
    Builder::new().filter_level(LevelFilter::Info).init();
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Read the API key from the environment. Empty values count as missing;
/// the service constructor rejects them the same way.
pub fn api_key_from_env() -> Option<String> {
    env::var("YOUTUBE_API_KEY").ok().filter(|key| !key.is_empty())
}
