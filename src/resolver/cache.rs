//! Deadline-aware resolution cache
//!
//! Entries have no fixed TTL. Every read re-derives the remaining validity
//! from the `deadline` embedded in the stored link and drops the entry once
//! less than the serve margin is left. Writes are skipped for links that are
//! already within the store margin of expiring.

use crate::{
    config::settings::CacheSettings,
    resolver::deadline::{Clock, DeadlineExtractor, SystemClock},
    types::CacheKey,
};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Key to direct-link store used by the resolver
#[async_trait]
pub trait LinkCache: Send + Sync + std::fmt::Debug {
    /// Cached link for the key, if it is still worth serving
    async fn get(&self, key: &CacheKey) -> Option<String>;

    /// Remember a freshly resolved link; returns whether it was stored
    async fn put(&self, key: CacheKey, url: String) -> bool;

    /// Drop every entry
    async fn clear(&self);

    /// Number of entries currently held
    async fn len(&self) -> usize;
}

/// Bounded LRU cache whose entry lifetimes come from the links themselves
#[derive(Debug)]
pub struct ExpiringCache {
    entries: Mutex<LruCache<CacheKey, String>>,
    deadlines: DeadlineExtractor,
    serve_margin_secs: i64,
    store_margin_secs: i64,
}

impl ExpiringCache {
    /// Create a cache from settings, reading wall-clock time
    pub fn new(settings: &CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a cache from settings with an explicit clock
    pub fn with_clock(settings: &CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(settings.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            deadlines: DeadlineExtractor::new(clock, settings.default_ttl_secs),
            serve_margin_secs: settings.serve_margin_secs,
            store_margin_secs: settings.store_margin_secs,
        }
    }
}

#[async_trait]
impl LinkCache for ExpiringCache {
    async fn get(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let Some(url) = entries.get(key).cloned() else {
            debug!("Cache miss for {}", key);
            return None;
        };

        let remaining = self.deadlines.remaining_secs(&url);
        if remaining > self.serve_margin_secs {
            info!("Cache hit for {}, {}s of validity left", key, remaining);
            return Some(url);
        }

        entries.pop(key);
        info!("Cache entry for {} expiring ({}s left), evicted", key, remaining);
        None
    }

    async fn put(&self, key: CacheKey, url: String) -> bool {
        let ttl = self
            .deadlines
            .remaining_secs(&url)
            .saturating_sub(self.store_margin_secs);
        if ttl <= 0 {
            debug!("Not caching {}: link expires too soon", key);
            return false;
        }

        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(key.clone(), url)
            && evicted != key
        {
            debug!("Cache full, evicted {}", evicted);
        }
        info!("Cached {}, TTL {}s", key, ttl);
        true
    }

    async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
