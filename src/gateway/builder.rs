//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::Gateway;
use crate::Result;
use crate::cache::{CacheConfig, FreshnessCache};
use crate::enrich::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, Enricher, RelationMap};
use crate::upstream::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Fetcher, HttpFetcher, UpstreamClient};

/// Main entry point for creating gateway instances.
pub struct Holonet;

impl Holonet {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> HolonetBuilder {
        HolonetBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// ```rust
/// # use holonet::{CacheConfig, Holonet};
/// # use std::time::Duration;
/// let gateway = Holonet::builder()
///     .base_url("https://swapi.dev/api")
///     .timeout(Duration::from_secs(5))
///     .cache(CacheConfig::new().ttl(Duration::from_secs(120)))
///     .max_depth(1)
///     .build()
///     .unwrap();
/// assert_eq!(gateway.max_depth(), 1);
/// ```
pub struct HolonetBuilder {
    base_url: String,
    timeout: Duration,
    cache: CacheConfig,
    shared_cache: Option<Arc<FreshnessCache>>,
    max_depth: usize,
    concurrency: usize,
    relations: Option<RelationMap>,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl HolonetBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
            shared_cache: None,
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
            relations: None,
            fetcher: None,
        }
    }

    /// Upstream base address that relative locators are joined to.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request upstream timeout (default: 10s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Freshness cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Use an existing cache instance instead of building one from
    /// [`cache()`](Self::cache).
    pub fn shared_cache(mut self, cache: Arc<FreshnessCache>) -> Self {
        self.shared_cache = Some(cache);
        self
    }

    /// Default enrichment traversal depth (default: 1).
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Items enriched concurrently per list (default: 8).
    pub fn enrich_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// Replace the default relation map.
    pub fn relations(mut self, relations: RelationMap) -> Self {
        self.relations = Some(relations);
        self
    }

    /// Use a custom fetcher instead of the HTTP one. `base_url` and
    /// `timeout` are ignored when set.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<Gateway> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(&self.base_url, self.timeout)?),
        };
        let cache = self
            .shared_cache
            .unwrap_or_else(|| Arc::new(FreshnessCache::new(&self.cache)));
        let client = Arc::new(UpstreamClient::new(fetcher, cache));
        let enricher = Enricher::new(
            Arc::clone(&client),
            Arc::new(self.relations.unwrap_or_default()),
        )
        .concurrency(self.concurrency);

        Ok(Gateway::new(
            client,
            enricher,
            self.max_depth,
            self.concurrency,
        ))
    }
}

impl Default for HolonetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
