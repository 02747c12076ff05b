//! Gateway wiring: one cache, one fetcher, one enricher.

mod builder;

pub use builder::{Holonet, HolonetBuilder};

use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::Result;
use crate::enrich::{Enricher, RelationMap};
use crate::types::{Locator, Page, Query, Record};
use crate::upstream::UpstreamClient;

/// Assembled aggregation core.
///
/// Holds the shared [`UpstreamClient`] (and through it the freshness cache)
/// plus the [`Enricher`] configured with the process-wide relation map and
/// default traversal depth.
pub struct Gateway {
    client: Arc<UpstreamClient>,
    enricher: Enricher,
    max_depth: usize,
    concurrency: usize,
}

impl Gateway {
    pub(crate) fn new(
        client: Arc<UpstreamClient>,
        enricher: Enricher,
        max_depth: usize,
        concurrency: usize,
    ) -> Self {
        Self {
            client,
            enricher,
            max_depth,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch one record through the cache.
    pub async fn get(&self, locator: impl Into<Locator>, query: &Query) -> Result<Record> {
        self.client.get(&locator.into(), query).await
    }

    /// Fetch one list page through the cache.
    pub async fn get_page(&self, locator: impl Into<Locator>, query: &Query) -> Result<Page> {
        self.client.get_page(&locator.into(), query).await
    }

    /// Fetch several records concurrently through the cache, in input order.
    pub async fn get_all(&self, locators: &[Locator]) -> Result<Vec<Record>> {
        let query = Query::new();
        let pending: Vec<_> = locators
            .iter()
            .map(|locator| self.client.get(locator, &query))
            .collect();
        stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    /// Enrich one record up to the configured depth.
    pub async fn enrich(&self, record: &Record, relations: &[String]) -> Result<Record> {
        self.enricher.enrich(record, relations, self.max_depth).await
    }

    /// Enrich one record up to an explicit depth.
    pub async fn enrich_to_depth(
        &self,
        record: &Record,
        relations: &[String],
        max_depth: usize,
    ) -> Result<Record> {
        self.enricher.enrich(record, relations, max_depth).await
    }

    /// Enrich a list concurrently, preserving order.
    pub async fn enrich_all(&self, records: Vec<Record>, relations: &[String]) -> Result<Vec<Record>> {
        self.enricher
            .enrich_all(records, relations, self.max_depth)
            .await
    }

    pub fn client(&self) -> &Arc<UpstreamClient> {
        &self.client
    }

    pub fn relations(&self) -> &RelationMap {
        self.enricher.relations()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drop every cached upstream payload. Test/administrative use only.
    pub fn clear_cache(&self) {
        self.client.clear_cache();
    }
}
