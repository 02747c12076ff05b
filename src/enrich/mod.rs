//! Relation enrichment.
//!
//! Upstream records reference each other by locator (a character links to
//! its homeworld and films; a film links back to its characters). The
//! [`Enricher`] replaces requested relation fields with the records they
//! point at, fetched through the cached [`UpstreamClient`].
//!
//! # Traversal
//!
//! ```text
//! enrich(luke, ["homeworld", "films"], max_depth = 1)
//!
//!   depth 0  luke ─┬─ homeworld: "planets/1/"        → { name: Tatooine }
//!                  └─ films: ["films/1/", "films/1/"] → [{ title: A New Hope }]
//!   depth 1  (not expanded: depth == max_depth)
//! ```
//!
//! Each top-level call owns a visit set of normalized locators. A locator is
//! resolved at most once per call: a repeated single reference is left as
//! the raw locator, a repeated entry in a list is dropped. This also bounds
//! work on cyclic graphs (film → character → same film) when `max_depth` is
//! raised.
//!
//! Unknown relation names and absent/empty fields are skipped. Any upstream
//! failure aborts the whole enrichment; there are no partial results.

mod relations;

pub use relations::RelationMap;

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cache::CacheKey;
use crate::telemetry;
use crate::types::{Locator, Query, Record, Relation};
use crate::upstream::{Target, UpstreamClient};
use crate::Result;

/// Default traversal depth: relations of the top-level record only.
pub const DEFAULT_MAX_DEPTH: usize = 1;

/// Default number of items enriched concurrently by [`Enricher::enrich_all`].
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Locators already resolved within one enrichment call tree.
#[derive(Debug, Default)]
struct VisitSet {
    seen: HashSet<CacheKey>,
}

impl VisitSet {
    /// Record a visit. Returns `false` if the key was already visited.
    fn insert(&mut self, key: CacheKey) -> bool {
        self.seen.insert(key)
    }
}

/// Resolves relation fields of records through the upstream client.
pub struct Enricher {
    client: Arc<UpstreamClient>,
    relations: Arc<RelationMap>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(client: Arc<UpstreamClient>, relations: Arc<RelationMap>) -> Self {
        Self {
            client,
            relations,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set how many items [`enrich_all`](Self::enrich_all) processes at once.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn relations(&self) -> &RelationMap {
        &self.relations
    }

    /// Enrich one record.
    ///
    /// Returns a new record with each requested relation resolved; the input
    /// is never modified. With no requested relations or `max_depth == 0`
    /// the record is returned unchanged.
    #[instrument(skip_all, fields(relations = ?requested, max_depth))]
    pub async fn enrich(
        &self,
        record: &Record,
        requested: &[String],
        max_depth: usize,
    ) -> Result<Record> {
        if requested.is_empty() || max_depth == 0 {
            return Ok(record.clone());
        }

        let mut visits = VisitSet::default();
        // The root itself counts as visited so deeper levels never refetch it.
        if let Some(url) = record.get_str("url")
            && let Ok(target) = self.client.resolve(&Locator::from(url), &Query::new())
        {
            visits.insert(target.cache_key());
        }

        self.enrich_level(record, requested, 0, max_depth, &mut visits)
            .await
    }

    /// Enrich every record, running up to `concurrency` items at once.
    ///
    /// Items are independent (each gets its own visit set) and the output
    /// keeps the input order regardless of completion order. The first
    /// failure fails the whole batch.
    pub async fn enrich_all(
        &self,
        records: Vec<Record>,
        requested: &[String],
        max_depth: usize,
    ) -> Result<Vec<Record>> {
        if requested.is_empty() || max_depth == 0 {
            return Ok(records);
        }

        let pending: Vec<_> = records
            .iter()
            .map(|record| self.enrich(record, requested, max_depth))
            .collect();
        stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    fn enrich_level<'a>(
        &'a self,
        record: &'a Record,
        requested: &'a [String],
        depth: usize,
        max_depth: usize,
        visits: &'a mut VisitSet,
    ) -> BoxFuture<'a, Result<Record>> {
        Box::pin(async move {
            if depth >= max_depth {
                return Ok(record.clone());
            }

            let mut out = record.clone();
            for name in requested {
                let Some(field) = self.relations.field_for(name) else {
                    metrics::counter!(telemetry::RELATIONS_SKIPPED_TOTAL, "reason" => "unknown_relation")
                        .increment(1);
                    debug!(
                        relation = %name,
                        known = ?self.relations.names(),
                        "ignoring unknown relation"
                    );
                    continue;
                };
                let Some(relation) = out.relation(field) else {
                    continue;
                };

                match relation {
                    Relation::One(locator) => {
                        let Some(target) = self.claim(&locator, visits)? else {
                            continue;
                        };
                        let resolved = self
                            .resolve(&target, name, requested, depth, max_depth, visits)
                            .await?;
                        out.insert(field, resolved);
                    }
                    Relation::Many(locators) => {
                        let mut resolved = Vec::with_capacity(locators.len());
                        for locator in &locators {
                            let Some(target) = self.claim(locator, visits)? else {
                                continue;
                            };
                            let record = self
                                .resolve(&target, name, requested, depth, max_depth, visits)
                                .await?;
                            resolved.push(Value::from(record));
                        }
                        out.insert(field, Value::Array(resolved));
                    }
                }
            }
            Ok(out)
        })
    }

    /// Resolve `locator` and mark it visited. `None` if it was visited already.
    fn claim(&self, locator: &Locator, visits: &mut VisitSet) -> Result<Option<Target>> {
        let target = self.client.resolve(locator, &Query::new())?;
        if visits.insert(target.cache_key()) {
            Ok(Some(target))
        } else {
            metrics::counter!(telemetry::RELATIONS_SKIPPED_TOTAL, "reason" => "visited")
                .increment(1);
            debug!(url = %target, "skipping already visited locator");
            Ok(None)
        }
    }

    async fn resolve(
        &self,
        target: &Target,
        relation: &str,
        requested: &[String],
        depth: usize,
        max_depth: usize,
        visits: &mut VisitSet,
    ) -> Result<Record> {
        let record = self.client.get_target(target).await?;
        metrics::counter!(telemetry::RELATIONS_RESOLVED_TOTAL, "relation" => relation.to_owned())
            .increment(1);
        self.enrich_level(&record, requested, depth + 1, max_depth, visits)
            .await
    }
}
