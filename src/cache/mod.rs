//! Freshness cache for upstream payloads.
//!
//! [`FreshnessCache`] is a key → record store where every entry expires a
//! fixed TTL after it was last written. Staleness is detected lazily: an
//! expired entry is treated as absent on read, it is not deleted by a timer.
//!
//! # Architecture
//!
//! One instance is constructed at startup and shared (`Arc`) by every
//! request through [`UpstreamClient`](crate::upstream::UpstreamClient). It is
//! injected rather than global, so tests and embedders get isolated
//! instances.
//!
//! The store is moka's async cache: individual reads and writes are atomic
//! per key, and capacity is bounded so a long-running process does not grow
//! without limit. Eviction by capacity never changes the freshness contract,
//! it only turns some would-be hits into misses.
//!
//! # Coalescing
//!
//! [`FreshnessCache::get_or_try_insert_with`] lets concurrent callers that
//! miss on the same key share one in-flight initializer. Failed initializers
//! are handed to every waiter and leave nothing behind in the cache.

mod key;

pub use key::CacheKey;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::types::Record;
use crate::{HolonetError, Result};

/// Configuration for the freshness cache.
///
/// ```rust
/// # use holonet::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(300));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 120 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(120),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Whether a lookup was served from the cache or by running the initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Fetched,
}

/// TTL-bounded in-memory store of upstream records.
pub struct FreshnessCache {
    entries: Cache<CacheKey, Record>,
    ttl: Duration,
}

impl FreshnessCache {
    /// Create a cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self {
            entries,
            ttl: config.ttl,
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh entry.
    ///
    /// Returns `None` on a miss or when the stored entry has expired.
    pub async fn get(&self, key: &CacheKey) -> Option<Record> {
        self.entries.get(key).await
    }

    /// Store a value, replacing any previous entry and restarting its TTL.
    pub async fn set(&self, key: CacheKey, value: Record) {
        self.entries.insert(key, value).await;
    }

    /// Return the fresh entry for `key`, or run `init` to produce and store one.
    ///
    /// Concurrent callers missing on the same key await a single `init`.
    /// An `Err` from `init` is returned to all of them and is not cached.
    pub async fn get_or_try_insert_with<F>(
        &self,
        key: &CacheKey,
        init: F,
    ) -> Result<(Record, Lookup)>
    where
        F: Future<Output = Result<Record>>,
    {
        let entry = self
            .entries
            .entry_by_ref(key)
            .or_try_insert_with(init)
            .await
            .map_err(|e: Arc<HolonetError>| (*e).clone())?;

        let lookup = if entry.is_fresh() {
            Lookup::Fetched
        } else {
            Lookup::Hit
        };
        Ok((entry.into_value(), lookup))
    }

    /// Remove every entry.
    ///
    /// Administrative: used between test cases, never by request handling.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for FreshnessCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str) -> Record {
        Record::from_value(json!({ "name": name })).unwrap()
    }

    fn key(s: &str) -> CacheKey {
        CacheKey::from_raw(s)
    }

    #[tokio::test]
    async fn set_then_get_returns_last_value() {
        let cache = FreshnessCache::default();
        cache.set(key("people/1/"), record("Luke")).await;
        cache.set(key("people/1/"), record("Leia")).await;

        let got = cache.get(&key("people/1/")).await.unwrap();
        assert_eq!(got.get_str("name"), Some("Leia"));
    }

    #[tokio::test]
    async fn init_error_is_not_cached() {
        let cache = FreshnessCache::default();
        let k = key("people/9/");

        let err = cache
            .get_or_try_insert_with(&k, async {
                Err(HolonetError::upstream_status(500, "boom"))
            })
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(cache.get(&k).await.is_none());

        let (value, lookup) = cache
            .get_or_try_insert_with(&k, async { Ok(record("IG-88")) })
            .await
            .unwrap();
        assert_eq!(lookup, Lookup::Fetched);
        assert_eq!(value.get_str("name"), Some("IG-88"));
    }

    #[tokio::test]
    async fn second_lookup_is_a_hit() {
        let cache = FreshnessCache::default();
        let k = key("planets/1/");

        let (_, first) = cache
            .get_or_try_insert_with(&k, async { Ok(record("Tatooine")) })
            .await
            .unwrap();
        let (value, second) = cache
            .get_or_try_insert_with(&k, async { Ok(record("Alderaan")) })
            .await
            .unwrap();

        assert_eq!(first, Lookup::Fetched);
        assert_eq!(second, Lookup::Hit);
        assert_eq!(value.get_str("name"), Some("Tatooine"));
    }
}
