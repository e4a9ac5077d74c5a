use std::time::Duration;

use ::scraper::Html;
use tracing::{debug, instrument};

use crate::config::{CrawlerConfig, RetryPolicy};
use crate::error::{Result, VlrError};
use crate::model::MatchRecord;
use crate::vlr_scraper::fetch::fetch_with_retry;
use crate::vlr_scraper::matches::parse_match_page;
use crate::vlr_scraper::results::{parse_last_page, parse_match_urls};

/// The main entry point for fetching pages from VLR.gg.
///
/// `VlrClient` wraps a [`reqwest::Client`] together with the site origin and
/// the retry policy applied to every request.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> vlr_stats_crawler::Result<()> {
/// use vlr_stats_crawler::VlrClient;
///
/// let client = VlrClient::new();
/// if let Some(last) = client.get_last_results_page().await? {
///     let urls = client.get_results_page(last).await?;
///     println!("{} matches on the oldest page", urls.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VlrClient {
    http: reqwest::Client,
    base_url: String,
    results_path: String,
    retry: RetryPolicy,
}

impl VlrClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        let defaults = CrawlerConfig::default();
        Self {
            http: client,
            base_url: defaults.base_url,
            results_path: defaults.results_path,
            retry: defaults.retry,
        }
    }

    /// Build the HTTP client from a [`CrawlerConfig`], including proxies.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(url) = &config.proxy.http {
            let proxy = reqwest::Proxy::http(url).map_err(|source| VlrError::InvalidProxy {
                url: url.clone(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }
        if let Some(url) = &config.proxy.https {
            let proxy = reqwest::Proxy::https(url).map_err(|source| VlrError::InvalidProxy {
                url: url.clone(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(VlrError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            results_path: config.results_path.clone(),
            retry: config.retry,
        })
    }

    /// Point the client at another origin (a mirror or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the results listing; `None` is the listing root.
    pub fn results_url(&self, page: Option<u32>) -> String {
        let root = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.results_path.trim_start_matches('/')
        );
        match page {
            Some(page) => format!("{root}?page={page}"),
            None => root,
        }
    }

    /// Highest page number of the results listing.
    ///
    /// `Ok(None)` when the listing has no pagination control or returned no data.
    #[instrument(skip(self))]
    pub async fn get_last_results_page(&self) -> Result<Option<u32>> {
        let url = self.results_url(None);
        let Some(body) = fetch_with_retry(&self.http, &url, &self.retry).await? else {
            return Ok(None);
        };
        let last = parse_last_page(&Html::parse_document(&body))?;
        debug!(?last, "resolved last results page");
        Ok(last)
    }

    /// Match URLs listed on one results page. A page with no data is empty.
    #[instrument(skip(self))]
    pub async fn get_results_page(&self, page: u32) -> Result<Vec<String>> {
        let url = self.results_url(Some(page));
        let Some(body) = fetch_with_retry(&self.http, &url, &self.retry).await? else {
            return Ok(Vec::new());
        };
        let urls = parse_match_urls(&Html::parse_document(&body), &self.base_url)?;
        debug!(page, count = urls.len(), "parsed results page");
        Ok(urls)
    }

    /// Fetch and extract a match page. `Ok(None)` when the page has no data.
    #[instrument(skip(self))]
    pub async fn get_match(&self, url: &str) -> Result<Option<MatchRecord>> {
        let Some(body) = fetch_with_retry(&self.http, url, &self.retry).await? else {
            return Ok(None);
        };
        parse_match_body(&body, url).map(Some)
    }
}

impl Default for VlrClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_match_body(body: &str, url: &str) -> Result<MatchRecord> {
    let document = Html::parse_document(body);
    parse_match_page(&document, url)
}
