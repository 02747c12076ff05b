//! Shared test fixtures: an in-memory upstream that counts requests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use holonet::{Fetcher, HolonetError, Record, Target};
use reqwest::Url;
use serde_json::Value;

pub const BASE: &str = "https://swapi.test/api";

/// Absolute URL for a path relative to [`BASE`].
pub fn url(path: &str) -> String {
    format!("{BASE}/{}", path.trim_start_matches('/'))
}

pub fn record(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

/// Fake upstream keyed by cache key (`url` or `url?query`).
pub struct MockFetcher {
    base_url: Url,
    responses: Mutex<HashMap<String, Result<Record, HolonetError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(BASE).unwrap(),
            responses: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
        }
    }

    /// Serve `value` for the relative path `path`.
    pub fn with(self, path: &str, value: Value) -> Self {
        self.set(path, value);
        self
    }

    /// Fail requests for `path` with `err`.
    pub fn with_error(self, path: &str, err: HolonetError) -> Self {
        self.responses.lock().unwrap().insert(url(path), Err(err));
        self
    }

    /// Delay responses for `path`.
    pub fn with_delay(self, path: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url(path), delay);
        self
    }

    /// Replace the payload served for `path`.
    pub fn set(&self, path: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url(path), Ok(record(value)));
    }

    /// Number of fetches issued for `path`.
    pub fn calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&url(path))
            .copied()
            .unwrap_or(0)
    }

    /// Number of fetches issued overall.
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch(&self, target: &Target) -> holonet::Result<Record> {
        let key = target.cache_key().as_str().to_string();
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(HolonetError::NotFound(key)))
    }
}
