//! Upstream access: locator resolution, the HTTP fetcher, and the cached
//! client that fronts it.
//!
//! ```text
//!  caller ──► UpstreamClient::get(locator, query)
//!                  │ resolve → Target (absolute url + merged query)
//!                  │ key     → CacheKey
//!                  ▼
//!           FreshnessCache ── hit ──► cached Record
//!                  │ miss (coalesced per key)
//!                  ▼
//!           Fetcher::fetch(target) ── one GET, no retry
//!                  │
//!                  ├── 404          → NotFound
//!                  ├── other ≥ 400  → Upstream { status }
//!                  ├── bad body     → Upstream
//!                  └── 2xx object   → Record (stored, then returned)
//! ```
//!
//! Failures are never cached: a failed key is fetched again on the next
//! call, even inside the TTL window.

mod client;
mod fetcher;
mod target;

pub use client::UpstreamClient;
pub use fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Fetcher, HttpFetcher};
pub use target::Target;
