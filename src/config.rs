use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, VlrError};

/// Environment variable holding the proxy for plain `http://` requests.
pub const HTTP_PROXY_ENV: &str = "HTTP";
/// Environment variable holding the proxy for `https://` requests.
pub const HTTPS_PROXY_ENV: &str = "HTTPS";

/// Crawler settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub results_path: String,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub discovery_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub batch_size: usize,
    pub retry: RetryPolicy,
    pub proxy: ProxyConfig,
    pub paths: PathsConfig,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.vlr.gg".to_string(),
            results_path: "/matches/results".to_string(),
            user_agent: None,
            timeout_secs: None,
            discovery_delay_ms: 500,
            detail_delay_ms: 500,
            batch_size: 100,
            retry: RetryPolicy::default(),
            proxy: ProxyConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl CrawlerConfig {
    /// Read a TOML config file. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| VlrError::io(path, e))?;
        let config = toml::from_str(&raw).map_err(|source| VlrError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Override proxy settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(http) = non_empty(HTTP_PROXY_ENV) {
            self.proxy.http = Some(http);
        }
        if let Some(https) = non_empty(HTTPS_PROXY_ENV) {
            self.proxy.https = Some(https);
        }
    }

    pub fn discovery_delay(&self) -> Duration {
        Duration::from_millis(self.discovery_delay_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

/// How often, and how patiently, a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 2000,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub urls: PathBuf,
    pub completion_log: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            urls: PathBuf::from("data/match_urls.json"),
            completion_log: PathBuf::from("scraped_urls.log"),
            output: PathBuf::from("scraped_data.json"),
        }
    }
}
