use thiserror::Error;

/// Fatal construction-time configuration problems. Never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key is required")]
    MissingApiKey,
}

/// A required pipeline stage yielded zero usable items. Carries the
/// human-readable cause the caller should display; no partial results are
/// returned on these paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("No videos found for '{keyword}'")]
    NoVideosFound { keyword: String },

    #[error("No videos found with {min_views}-{max_views} views")]
    NoViewMatches { min_views: u64, max_views: u64 },

    #[error("No channels match video count criteria")]
    NoVideoCountMatches,

    #[error("No channels match subscriber criteria")]
    NoSubscriberMatches,
}
