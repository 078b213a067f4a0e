//! # Resolution Facade
//!
//! [`LinkResolverGeneric`] is the entry point of the resolution engine. It
//! classifies a target URL and drives one of two paths:
//!
//! - **Primary platform**: parse id and part, check the cache, on a miss call
//!   the [`PlaybackProvider`] and store the result.
//! - **Anything else**: hand the page to the first matching [`Extractor`].
//!   Nothing on this path is cached.
//!
//! ## Coalescing
//!
//! Concurrent misses for the same [`CacheKey`] queue on a per-key lock. The
//! first request performs the upstream exchange; the others re-check the cache
//! once it is released and only go upstream if the link could not be stored.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use vidproxy::config::Settings;
//! use vidproxy::resolver::LinkResolver;
//!
//! # async fn example() -> vidproxy::Result<()> {
//! let resolver = LinkResolver::new(Settings::default())?;
//! let target = url::Url::parse("https://www.bilibili.com/video/BV1xx411c7mD").unwrap();
//! let direct = resolver.resolve(&target).await?;
//! println!("redirect to {}", direct);
//! # Ok(())
//! # }
//! ```

use crate::{
    Error, Result,
    config::Settings,
    resolver::{
        cache::{ExpiringCache, LinkCache},
        extractor::{Extractor, PlayAddrExtractor},
        target::{self, Target},
        upstream::{BilibiliClient, PlaybackProvider},
    },
    types::CacheKey,
};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Per-key locks for in-flight upstream resolutions
type InFlight = std::sync::Mutex<HashMap<CacheKey, Waiters>>;

/// Lock shared by every request currently resolving one key
#[derive(Debug, Default)]
struct Waiters {
    lock: Arc<Mutex<()>>,
    count: usize,
}

/// Registration of one request under a key; unregisters on drop, so
/// cancelled resolutions leave nothing behind in the in-flight map.
struct Gate<'a> {
    in_flight: &'a InFlight,
    key: CacheKey,
    lock: Arc<Mutex<()>>,
}

impl Drop for Gate<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(waiters) = in_flight.get_mut(&self.key) {
            waiters.count -= 1;
            if waiters.count == 0 {
                in_flight.remove(&self.key);
            }
        }
    }
}

/// Convenience type alias for the resolver backed by the platform API client
pub type LinkResolver = LinkResolverGeneric<BilibiliClient>;

/// Combines target parsing, caching, upstream lookup and page extraction
#[derive(Debug)]
pub struct LinkResolverGeneric<P: PlaybackProvider = BilibiliClient> {
    /// Configuration settings
    settings: Arc<Settings>,
    /// Upstream resolver for primary platform videos
    provider: Arc<P>,
    /// Resolution cache
    cache: Arc<dyn LinkCache>,
    /// Extractors for other platforms, tried in order
    extractors: Vec<Arc<dyn Extractor>>,
    /// Keys currently being resolved upstream
    in_flight: InFlight,
}

impl LinkResolverGeneric<BilibiliClient> {
    /// Creates a resolver with the production API client, an LRU cache and
    /// the `playAddr` extractor, all configured from `settings`.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = build_http_client(&settings)?;
        let provider = BilibiliClient::new(client.clone(), &settings.upstream);
        let cache = Arc::new(ExpiringCache::new(&settings.cache));
        let extractors: Vec<Arc<dyn Extractor>> = vec![Arc::new(PlayAddrExtractor::new(client))];

        Ok(Self::with_parts(settings, provider, cache, extractors))
    }
}

impl<P> LinkResolverGeneric<P>
where
    P: PlaybackProvider,
{
    /// Creates a resolver from explicit collaborators
    pub fn with_parts(
        settings: Settings,
        provider: P,
        cache: Arc<dyn LinkCache>,
        extractors: Vec<Arc<dyn Extractor>>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            provider: Arc::new(provider),
            cache,
            extractors,
            in_flight: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Settings the resolver was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve a validated target URL into a direct media URL
    pub async fn resolve(&self, target: &Url) -> Result<String> {
        match target::classify(target, &self.settings.upstream.primary_domain)? {
            Target::Primary(key) => self.resolve_primary(key).await,
            Target::Generic(page) => self.resolve_generic(&page).await,
        }
    }

    /// Cache-fronted resolution of one part of a primary platform video
    pub async fn resolve_primary(&self, key: CacheKey) -> Result<String> {
        if let Some(url) = self.cache.get(&key).await {
            return Ok(url);
        }

        let gate = self.gate_for(&key);
        let _turn = gate.lock.lock().await;
        match self.cache.get(&key).await {
            Some(url) => Ok(url),
            None => self.fetch_and_store(&key).await,
        }
    }

    /// Uncached resolution of a page on any other platform
    pub async fn resolve_generic(&self, page: &Url) -> Result<String> {
        let extractor = self
            .extractors
            .iter()
            .find(|extractor| extractor.matches(page))
            .ok_or_else(|| Error::pattern_not_found(format!("no extractor for {}", page)))?;

        debug!("Extracting {} with {}", page, extractor.name());
        extractor.extract(page).await
    }

    /// Drop all cached links
    pub async fn invalidate_caches(&self) {
        self.cache.clear().await;
        info!("Resolution cache invalidated");
    }

    /// Number of cached links
    pub async fn cached_links(&self) -> usize {
        self.cache.len().await
    }

    // Private helper methods...

    async fn fetch_and_store(&self, key: &CacheKey) -> Result<String> {
        info!("Resolving {} upstream", key);
        let url = self.provider.resolve(&key.video, key.part).await?;
        self.cache.put(key.clone(), url.clone()).await;
        Ok(url)
    }

    fn gate_for(&self, key: &CacheKey) -> Gate<'_> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let waiters = in_flight.entry(key.clone()).or_default();
        waiters.count += 1;
        Gate {
            in_flight: &self.in_flight,
            key: key.clone(),
            lock: waiters.lock.clone(),
        }
    }

    #[cfg(test)]
    fn in_flight_keys(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Shared outbound client with the configured browser-like identity
pub fn build_http_client(settings: &Settings) -> Result<Client> {
    let mut builder = Client::builder().user_agent(settings.upstream.user_agent.clone());
    if let Some(timeout) = settings.upstream.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
