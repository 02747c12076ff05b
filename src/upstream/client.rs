//! Cached upstream client.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::{Fetcher, Target};
use crate::cache::{FreshnessCache, Lookup};
use crate::telemetry;
use crate::types::{Locator, Page, Query, Record};
use crate::Result;

/// Read-through client combining a [`Fetcher`] with a [`FreshnessCache`].
///
/// A fresh cache entry is returned without touching the network. On a miss
/// the fetcher is called once per key, even when several callers miss on
/// the same key at the same time; the successful result is cached with the
/// configured TTL. Failures propagate unchanged and are never cached.
pub struct UpstreamClient {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<FreshnessCache>,
}

impl UpstreamClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: Arc<FreshnessCache>) -> Self {
        Self { fetcher, cache }
    }

    /// Resolve a locator against the fetcher's base address.
    pub fn resolve(&self, locator: &Locator, query: &Query) -> Result<Target> {
        Target::resolve(self.fetcher.base_url(), locator, query)
    }

    /// Fetch a record through the cache.
    pub async fn get(&self, locator: &Locator, query: &Query) -> Result<Record> {
        let target = self.resolve(locator, query)?;
        self.get_target(&target).await
    }

    /// Fetch a list payload through the cache and interpret it as a page.
    pub async fn get_page(&self, locator: &Locator, query: &Query) -> Result<Page> {
        let payload = self.get(locator, query).await?;
        Page::from_record(&payload)
    }

    /// Fetch an already resolved target through the cache.
    #[instrument(skip(self), fields(url = %target))]
    pub async fn get_target(&self, target: &Target) -> Result<Record> {
        let key = target.cache_key();
        let fetcher = Arc::clone(&self.fetcher);

        let (record, lookup) = self
            .cache
            .get_or_try_insert_with(&key, async move {
                debug!(fetcher = fetcher.name(), "cache miss, fetching upstream");
                fetcher.fetch(target).await
            })
            .await?;

        match lookup {
            Lookup::Hit => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!("cache hit");
            }
            Lookup::Fetched => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            }
        }
        Ok(record)
    }

    pub fn cache(&self) -> &Arc<FreshnessCache> {
        &self.cache
    }

    /// Drop every cached entry. Test/administrative use only.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
