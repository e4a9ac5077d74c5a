//! Two-stage crawl over the results listing and the match pages it links.

mod completion_log;
mod records;
mod seeds;

use std::path::Path;
use std::time::Duration;

use itertools::Itertools;
use tracing::{debug, error, info, instrument, warn};

use crate::client::VlrClient;
use crate::config::CrawlerConfig;
use crate::error::{Result, VlrError};
use crate::model::MatchRecord;

pub use completion_log::CompletionLog;
pub use records::JsonLinesSink;
pub use seeds::{read_seeds, write_seeds};

/// Counts reported at the end of [`Crawler::scrape`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URLs found in the completion log before this run started.
    pub already_done: usize,
    /// URLs visited by this run.
    pub attempted: usize,
    pub recorded: usize,
    /// Pages that answered with a status other than `200 OK`.
    pub no_data: usize,
    pub failed: usize,
    /// Output records absorbed into a log that was missing them.
    pub reconciled: usize,
}

/// Drives discovery and detail scraping with politeness delays and checkpoints.
#[derive(Debug, Clone)]
pub struct Crawler {
    client: VlrClient,
    discovery_delay: Duration,
    detail_delay: Duration,
    batch_size: usize,
    limit: Option<usize>,
}

impl Crawler {
    pub fn new(client: VlrClient, config: &CrawlerConfig) -> Self {
        Self {
            client,
            discovery_delay: config.discovery_delay(),
            detail_delay: config.detail_delay(),
            batch_size: config.batch_size.max(1),
            limit: None,
        }
    }

    /// Visit at most `limit` pending URLs per [`scrape`](Self::scrape).
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Collect every match URL from results pages `1..=last`.
    ///
    /// Fails when the last page cannot be determined. A page that fails
    /// after retries is logged and contributes nothing.
    #[instrument(skip(self))]
    pub async fn discover(&self) -> Result<Vec<String>> {
        let last = self.client.get_last_results_page().await?;
        tokio::time::sleep(self.discovery_delay).await;
        let Some(last) = last else {
            let url = self.client.results_url(None);
            error!(url, "results listing has no pagination");
            return Err(VlrError::LastPageUnknown { url });
        };
        info!(last_page = last, "paginating results");

        let mut urls = Vec::new();
        for page in 1..=last {
            match self.client.get_results_page(page).await {
                Ok(page_urls) => {
                    debug!(page, count = page_urls.len(), "collected match urls");
                    urls.extend(page_urls);
                }
                Err(e) => warn!(page, error = %e, "skipping results page"),
            }
            tokio::time::sleep(self.discovery_delay).await;
        }

        let urls = urls.into_iter().unique().collect_vec();
        info!(count = urls.len(), "discovered match urls");
        Ok(urls)
    }

    /// Scrape every seed not yet in `log`, appending records to `sink`.
    ///
    /// Records are written in batches. After each batch is synced to the
    /// output, its URLs are recorded in the log, so a URL in the log always
    /// has its record on disk. URLs whose record reached the output but not
    /// the log are absorbed into the log before any fetch.
    #[instrument(skip_all, fields(seeds = seeds.len()))]
    pub async fn scrape(
        &self,
        seeds: Vec<String>,
        log: &mut CompletionLog,
        sink: &JsonLinesSink,
    ) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary {
            reconciled: log.absorb(sink.recorded_urls()?)?,
            ..CrawlSummary::default()
        };
        if summary.reconciled > 0 {
            warn!(
                count = summary.reconciled,
                "completion log was missing urls already in the output"
            );
        }

        let unique = seeds.into_iter().unique().collect_vec();
        let (done, pending): (Vec<_>, Vec<_>) = unique.into_iter().partition(|u| log.contains(u));
        summary.already_done = done.len();
        let pending = pending
            .into_iter()
            .take(self.limit.unwrap_or(usize::MAX))
            .collect_vec();
        info!(
            pending = pending.len(),
            already_done = summary.already_done,
            "starting match scrape"
        );

        let total = pending.len();
        let mut batch = Vec::with_capacity(self.batch_size.min(total));
        for (index, url) in pending.iter().enumerate() {
            info!("[{}/{}] {}", index + 1, total, url);
            match self.client.get_match(url).await {
                Ok(Some(record)) => batch.push(record),
                Ok(None) => {
                    debug!(url, "no data");
                    summary.no_data += 1;
                }
                Err(e) => {
                    warn!(url, error = %e, "skipping match");
                    summary.failed += 1;
                }
            }
            summary.attempted += 1;

            if summary.attempted % self.batch_size == 0 {
                summary.recorded += checkpoint(&mut batch, sink, log)?;
            }
            tokio::time::sleep(self.detail_delay).await;
        }
        summary.recorded += checkpoint(&mut batch, sink, log)?;

        info!(
            recorded = summary.recorded,
            no_data = summary.no_data,
            failed = summary.failed,
            "match scrape finished"
        );
        Ok(summary)
    }
}

/// Persist `batch` to the output, then mark its URLs complete.
fn checkpoint(
    batch: &mut Vec<MatchRecord>,
    sink: &JsonLinesSink,
    log: &mut CompletionLog,
) -> Result<usize> {
    if batch.is_empty() {
        return Ok(0);
    }
    sink.append(batch.as_slice())?;
    log.absorb(batch.iter().map(|r| r.url.as_str()))?;
    let written = batch.len();
    debug!(written, completed = log.len(), "checkpoint");
    batch.clear();
    Ok(written)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| VlrError::io(parent, e))
        }
        _ => Ok(()),
    }
}
