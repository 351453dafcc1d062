//! Memoizing decorator over a [`VideoPlatform`].
//!
//! Purely additive: the pipeline behaves identically with or without it,
//! it just avoids re-spending quota when the surrounding application
//! repeats a search. Caches are keyed by call arguments; id-set keys are
//! sorted so argument order does not fragment the cache.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

use crate::models::{ChannelStats, LatestVideo, VideoCandidate, VideoStats};
use crate::services::youtube::VideoPlatform;

pub struct CachedPlatform<P> {
    inner: P,
    search_cache: Mutex<HashMap<(String, usize), Vec<VideoCandidate>>>,
    video_stats_cache: Mutex<HashMap<Vec<String>, HashMap<String, VideoStats>>>,
    channel_stats_cache: Mutex<HashMap<Vec<String>, HashMap<String, ChannelStats>>>,
    playlist_cache: Mutex<HashMap<(String, usize), Vec<LatestVideo>>>,
}

impl<P> CachedPlatform<P> {
    pub fn new(inner: P) -> Self {
        CachedPlatform {
            inner,
            search_cache: Mutex::new(HashMap::new()),
            video_stats_cache: Mutex::new(HashMap::new()),
            channel_stats_cache: Mutex::new(HashMap::new()),
            playlist_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

fn id_set_key(ids: &[String]) -> Vec<String> {
    let mut key = ids.to_vec();
    key.sort_unstable();
    key
}

#[async_trait]
impl<P: VideoPlatform> VideoPlatform for CachedPlatform<P> {
    async fn search_videos(&self, keyword: &str, max_total_results: usize) -> Vec<VideoCandidate> {
        let key = (keyword.to_string(), max_total_results);
        if let Some(hit) = self.search_cache.lock().await.get(&key) {
            debug!("Search cache hit for '{keyword}'");
            return hit.clone();
        }

        let result = self.inner.search_videos(keyword, max_total_results).await;
        self.search_cache.lock().await.insert(key, result.clone());
        result
    }

    async fn get_video_statistics(&self, video_ids: &[String]) -> HashMap<String, VideoStats> {
        let key = id_set_key(video_ids);
        if let Some(hit) = self.video_stats_cache.lock().await.get(&key) {
            return hit.clone();
        }

        let result = self.inner.get_video_statistics(video_ids).await;
        self.video_stats_cache
            .lock()
            .await
            .insert(key, result.clone());
        result
    }

    async fn get_channel_statistics(&self, channel_ids: &[String]) -> HashMap<String, ChannelStats> {
        let key = id_set_key(channel_ids);
        if let Some(hit) = self.channel_stats_cache.lock().await.get(&key) {
            return hit.clone();
        }

        let result = self.inner.get_channel_statistics(channel_ids).await;
        self.channel_stats_cache
            .lock()
            .await
            .insert(key, result.clone());
        result
    }

    async fn get_channel_latest_videos(
        &self,
        uploads_playlist_id: &str,
        max_results: usize,
    ) -> Vec<LatestVideo> {
        let key = (uploads_playlist_id.to_string(), max_results);
        if let Some(hit) = self.playlist_cache.lock().await.get(&key) {
            return hit.clone();
        }

        let result = self
            .inner
            .get_channel_latest_videos(uploads_playlist_id, max_results)
            .await;
        self.playlist_cache.lock().await.insert(key, result.clone());
        result
    }
}
