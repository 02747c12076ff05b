//! Holonet - read-through aggregation gateway for cross-referenced REST data
//!
//! Holonet sits in front of a paginated upstream API whose records link to
//! each other by URL (a character links to its homeworld and films). It
//! memoizes upstream fetches in a TTL-bounded cache, resolves requested
//! relation fields inline to a bounded depth without refetching or looping
//! on cycles, and offers client-side filtering, sorting, projection and
//! re-pagination the upstream does not support.
//!
//! # Example
//!
//! ```rust,no_run
//! use holonet::{Holonet, Query};
//!
//! #[tokio::main]
//! async fn main() -> holonet::Result<()> {
//!     let gateway = Holonet::builder()
//!         .base_url("https://swapi.dev/api")
//!         .build()?;
//!
//!     let luke = gateway.get("people/1/", &Query::new()).await?;
//!     let luke = gateway.enrich(&luke, &["homeworld".to_string()]).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&luke).unwrap());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod enrich;
pub mod error;
pub mod gateway;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
pub mod upstream;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, FreshnessCache};
pub use enrich::{Enricher, RelationMap};
pub use error::{HolonetError, Result};
pub use gateway::{Gateway, Holonet, HolonetBuilder};
pub use types::{Locator, Page, Query, Record, Relation};
pub use upstream::{Fetcher, HttpFetcher, Target, UpstreamClient};
pub use version::{BuildInfo, PKG_VERSION, version_string};
