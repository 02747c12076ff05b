//! Telemetry metric name constants.
//!
//! Centralised metric names for holonet operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `holonet_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Total requests sent upstream.
///
/// Labels: `status` ("ok" | "not_found" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "holonet_upstream_requests_total";

/// Upstream request duration in seconds.
pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "holonet_upstream_request_duration_seconds";

/// Lookups served from the freshness cache (including callers that joined
/// an in-flight fetch).
pub const CACHE_HITS_TOTAL: &str = "holonet_cache_hits_total";

/// Lookups that ran an upstream fetch.
pub const CACHE_MISSES_TOTAL: &str = "holonet_cache_misses_total";

/// Relation locators resolved during enrichment.
///
/// Labels: `relation`.
pub const RELATIONS_RESOLVED_TOTAL: &str = "holonet_relations_resolved_total";

/// Relation locators skipped during enrichment.
///
/// Labels: `reason` ("visited" | "unknown_relation").
pub const RELATIONS_SKIPPED_TOTAL: &str = "holonet_relations_skipped_total";
