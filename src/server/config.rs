//! Configuration loading for holonetd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.holonet/config.toml` (user)
//! 3. `/etc/holonet/config.toml` (system)
//! 4. built-in defaults
//!
//! Environment variables override file values afterwards (see
//! [`ENV_OVERRIDES`]). Everything is read once at startup.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::cache::CacheConfig;
use crate::enrich::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH};
use crate::gateway::{Holonet, HolonetBuilder};
use crate::upstream::DEFAULT_BASE_URL;
use crate::{HolonetError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub enrich: EnrichConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Upstream data source.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base address relative locators are joined to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: f64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> f64 {
    10.0
}

/// Freshness cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry time-to-live in seconds (default: 120).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Maximum cached entries (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl() -> u64 {
    120
}

fn default_max_entries() -> u64 {
    10_000
}

/// Relation enrichment settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichConfig {
    /// Maximum traversal depth (default: 1).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Items enriched concurrently per list (default: 8).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

/// Resources the HTTP layer is allowed to proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default = "default_resources")]
    pub supported: BTreeSet<String>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            supported: default_resources(),
        }
    }
}

fn default_resources() -> BTreeSet<String> {
    ["people", "planets", "starships", "films"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Environment variable overrides, applied after the config file.
pub const ENV_OVERRIDES: &[&str] = &[
    "HOLONET_ADDRESS",
    "SWAPI_BASE_URL",
    "HTTP_TIMEOUT_SECONDS",
    "CACHE_TTL_SECONDS",
    "MAX_INCLUDE_DEPTH",
];

impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => {
                info!(path = %path.display(), "loading config file");
                Self::load_from_file(&path)?
            }
            None => {
                info!("no config file found, using defaults");
                Config::default()
            }
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HolonetError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HolonetError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `None` means no file anywhere.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HolonetError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".holonet").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/holonet/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("HOLONET_ADDRESS") {
            self.server.address = address;
        }
        if let Some(url) = lookup("SWAPI_BASE_URL") {
            self.upstream.base_url = url;
        }
        if let Some(raw) = lookup("HTTP_TIMEOUT_SECONDS") {
            self.upstream.timeout_secs = parse_env("HTTP_TIMEOUT_SECONDS", &raw)?;
        }
        if let Some(raw) = lookup("CACHE_TTL_SECONDS") {
            self.cache.ttl_secs = parse_env("CACHE_TTL_SECONDS", &raw)?;
        }
        if let Some(raw) = lookup("MAX_INCLUDE_DEPTH") {
            self.enrich.max_depth = parse_env("MAX_INCLUDE_DEPTH", &raw)?;
        }
        Ok(())
    }

    /// Reject values that cannot be turned into a working gateway.
    pub fn validate(&self) -> Result<()> {
        self.timeout()?;
        if self.resources.supported.is_empty() {
            return Err(HolonetError::Configuration(
                "resources.supported must list at least one resource".to_string(),
            ));
        }
        Ok(())
    }

    /// Upstream timeout as a duration.
    pub fn timeout(&self) -> Result<Duration> {
        let secs = self.upstream.timeout_secs;
        if secs <= 0.0 {
            return Err(HolonetError::Configuration(format!(
                "upstream timeout must be positive, got {secs}"
            )));
        }
        Duration::try_from_secs_f64(secs).map_err(|e| {
            HolonetError::Configuration(format!("invalid upstream timeout {secs}: {e}"))
        })
    }

    /// Gateway builder populated from this configuration.
    pub fn gateway_builder(&self) -> Result<HolonetBuilder> {
        Ok(Holonet::builder()
            .base_url(&self.upstream.base_url)
            .timeout(self.timeout()?)
            .cache(
                CacheConfig::new()
                    .ttl(Duration::from_secs(self.cache.ttl_secs))
                    .max_entries(self.cache.max_entries),
            )
            .max_depth(self.enrich.max_depth)
            .enrich_concurrency(self.enrich.concurrency))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| HolonetError::Configuration(format!("Invalid value for {name}: {raw} ({e})")))
}
