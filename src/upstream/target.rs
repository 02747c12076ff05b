//! Resolution of locators to concrete upstream requests.

use std::fmt;

use reqwest::Url;

use crate::cache::CacheKey;
use crate::types::{Locator, Query};
use crate::{HolonetError, Result};

/// A fully resolved upstream request: absolute URL without query string,
/// plus every query parameter (explicit and embedded in the locator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    query: Query,
}

impl Target {
    /// Resolve `locator` against `base`.
    ///
    /// Absolute locators are used as-is; relative ones are joined to the
    /// base with exactly one `/` between them. Parameters embedded in the
    /// locator (e.g. an upstream `next` link) are merged into `query`;
    /// explicit parameters win on conflict.
    ///
    /// Locators come from upstream payloads, so one that does not parse as
    /// a URL is an `Upstream` error.
    pub fn resolve(base: &Url, locator: &Locator, query: &Query) -> Result<Self> {
        let raw = if locator.is_absolute() {
            locator.as_str().to_string()
        } else {
            format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                locator.as_str().trim_start_matches('/')
            )
        };

        let mut url = Url::parse(&raw).map_err(|e| {
            HolonetError::upstream(format!("malformed upstream locator '{locator}': {e}"))
        })?;

        let mut merged = query.clone();
        merged.merge_missing(url.query_pairs().into_owned());
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self { url, query: merged })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Normalized cache identity of this request.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.url.as_str(), &self.query)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://swapi.dev/api").unwrap()
    }

    #[test]
    fn relative_locator_joins_base() {
        let t = Target::resolve(&base(), &"people/1/".into(), &Query::new()).unwrap();
        assert_eq!(t.url().as_str(), "https://swapi.dev/api/people/1/");
    }

    #[test]
    fn leading_and_trailing_slashes_collapse() {
        let base = Url::parse("https://swapi.dev/api/").unwrap();
        let t = Target::resolve(&base, &"/planets/1/".into(), &Query::new()).unwrap();
        assert_eq!(t.url().as_str(), "https://swapi.dev/api/planets/1/");
    }

    #[test]
    fn absolute_locator_ignores_base() {
        let t = Target::resolve(
            &base(),
            &"https://mirror.example/api/films/1/".into(),
            &Query::new(),
        )
        .unwrap();
        assert_eq!(t.url().as_str(), "https://mirror.example/api/films/1/");
    }

    #[test]
    fn relative_and_absolute_share_a_key() {
        let a = Target::resolve(&base(), &"people/1/".into(), &Query::new()).unwrap();
        let b = Target::resolve(
            &base(),
            &"https://swapi.dev/api/people/1/".into(),
            &Query::new(),
        )
        .unwrap();
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn embedded_query_merges_into_key() {
        let a = Target::resolve(&base(), &"people/?page=2".into(), &Query::new()).unwrap();
        let b = Target::resolve(&base(), &"people/".into(), &Query::new().param("page", 2))
            .unwrap();
        assert_eq!(a.url().as_str(), "https://swapi.dev/api/people/");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn explicit_query_wins_over_embedded() {
        let t = Target::resolve(
            &base(),
            &"people/?page=2".into(),
            &Query::new().param("page", 5),
        )
        .unwrap();
        assert_eq!(t.query().get("page"), Some("5"));
    }

    #[test]
    fn invalid_absolute_locator_is_upstream_error() {
        let err = Target::resolve(&base(), &"http://".into(), &Query::new()).unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.status(), None);
    }
}
