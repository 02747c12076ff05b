//! Upstream fetchers.
//!
//! [`Fetcher`] is the seam between the cached client and the network: one
//! call, one request, a parsed [`Record`] or a classified failure. No
//! caching and no retries happen at this layer.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use super::Target;
use crate::telemetry;
use crate::types::{Locator, Query, Record};
use crate::{HolonetError, Result};

/// Default upstream base address.
pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Single-request access to the upstream data source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetcher name for logging/metrics.
    fn name(&self) -> &str;

    /// Base address that relative locators are joined to.
    fn base_url(&self) -> &Url;

    /// Issue one read request for `target`.
    ///
    /// Returns `NotFound` for an upstream 404 and `Upstream` for any other
    /// error status, an undecodable body, or a transport failure.
    async fn fetch(&self, target: &Target) -> Result<Record>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            HolonetError::Configuration(format!("invalid upstream base url '{base_url}': {e}"))
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                HolonetError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client, base_url })
    }

    /// Resolve `locator` against this fetcher's base address and fetch it.
    pub async fn fetch_locator(&self, locator: &Locator, query: &Query) -> Result<Record> {
        let target = Target::resolve(&self.base_url, locator, query)?;
        self.fetch(&target).await
    }

    async fn send(&self, target: &Target) -> Result<Record> {
        let params: Vec<(&str, &str)> = target.query().iter().collect();
        let response = self
            .client
            .get(target.url().clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HolonetError::NotFound(target.to_string()));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(HolonetError::upstream_status(
                status.as_u16(),
                format!("upstream error {} for {target}", status.as_u16()),
            ));
        }

        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
            HolonetError::upstream(format!("malformed upstream payload from {target}: {e}"))
        })?;
        Record::from_value(value)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch(&self, target: &Target) -> Result<Record> {
        let start = Instant::now();
        let result = self.send(target).await;
        let elapsed = start.elapsed();

        let status = match &result {
            Ok(_) => "ok",
            Err(HolonetError::NotFound(_)) => "not_found",
            Err(_) => "error",
        };
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::UPSTREAM_REQUEST_DURATION_SECONDS)
            .record(elapsed.as_secs_f64());

        match &result {
            Ok(_) => debug!(
                url = %target,
                elapsed_ms = elapsed.as_millis() as u64,
                "upstream fetch ok"
            ),
            Err(e) => warn!(url = %target, error = %e, "upstream fetch failed"),
        }
        result
    }
}
