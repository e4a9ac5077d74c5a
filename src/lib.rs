//! Crawl Valorant match statistics from [VLR.gg](https://www.vlr.gg).
//!
//! Discovery walks the paginated results listing and collects match URLs.
//! Scraping visits each URL, extracts a [`MatchRecord`] and appends it to a
//! JSON-lines file, tracking progress in a [`CompletionLog`] so an interrupted
//! run resumes where it stopped.

pub use client::VlrClient;
pub use config::{CrawlerConfig, RetryPolicy};
pub use crawl::{CompletionLog, CrawlSummary, Crawler, JsonLinesSink};
pub use error::{Result, VlrError};
pub use model::{
    MapInfo, MapRecord, MatchRecord, PlayerRecord, PlayerStats, StatCategory, StatLine,
    TeamInMap, TeamOverview,
};

pub mod client;
pub mod config;
pub mod crawl;
pub mod error;
pub mod model;
pub mod vlr_scraper;
