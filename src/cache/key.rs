//! Cache key normalization.

use std::fmt;

use crate::types::Query;

/// Identity of one upstream request for caching purposes.
///
/// Rendered as `{absolute url}` or `{absolute url}?{k=v&...}` with the
/// parameters in key order, so the same resource requested through a
/// relative path, an absolute URL, or a differently ordered parameter set
/// lands on one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from an absolute URL (without query string) and its
    /// parameters.
    pub fn new(url: &str, query: &Query) -> Self {
        if query.is_empty() {
            Self(url.to_string())
        } else {
            Self(format!("{url}?{query}"))
        }
    }

    /// Wrap an already-normalized key.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
