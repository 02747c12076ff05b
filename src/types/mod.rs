//! Core data types shared by the cache, the upstream client and the enricher.

mod page;
mod query;
mod record;

pub use page::Page;
pub use query::Query;
pub use record::{Locator, Record, Relation};
