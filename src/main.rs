//! Command-line entry point for the VLR.gg match crawler.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vlr_stats_crawler::crawl::{read_seeds, write_seeds};
use vlr_stats_crawler::{CompletionLog, Crawler, CrawlerConfig, JsonLinesSink, VlrClient};

/// Crawl Valorant match statistics from vlr.gg
#[derive(Parser, Debug)]
#[command(name = "vlr-stats-crawler", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect match URLs from every results page
    Discover {
        /// Where to write the URL list
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Scrape match pages not yet in the completion log
    Scrape(ScrapeArgs),
    /// Discover, then scrape
    Run(ScrapeArgs),
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// URL list to scrape (JSON array or one URL per line)
    #[arg(long, value_name = "FILE")]
    urls: Option<PathBuf>,

    /// JSON-lines output file
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Completion log
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Scrape at most this many pending URLs
    #[arg(long)]
    limit: Option<usize>,

    /// Checkpoint after this many processed URLs
    #[arg(long)]
    batch_size: Option<usize>,
}

impl ScrapeArgs {
    fn apply(&self, config: &mut CrawlerConfig) {
        if let Some(urls) = &self.urls {
            config.paths.urls = urls.clone();
        }
        if let Some(out) = &self.out {
            config.paths.output = out.clone();
        }
        if let Some(log) = &self.log {
            config.paths.completion_log = log.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Must precede the subscriber: `.env` can set RUST_LOG.
    let dotenv = dotenvy::dotenv();
    setup_logging(cli.verbose, cli.quiet);
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let mut config = match &cli.config {
        Some(path) => CrawlerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CrawlerConfig::default(),
    };
    config.apply_env();

    match cli.command {
        Command::Discover { out } => {
            if let Some(out) = out {
                config.paths.urls = out;
            }
            let crawler = build_crawler(&config, None)?;
            discover(&crawler, &config).await?;
        }
        Command::Scrape(args) => {
            args.apply(&mut config);
            let crawler = build_crawler(&config, args.limit)?;
            let seeds = read_seeds(&config.paths.urls)
                .with_context(|| format!("reading {}", config.paths.urls.display()))?;
            scrape(&crawler, &config, seeds).await?;
        }
        Command::Run(args) => {
            args.apply(&mut config);
            let crawler = build_crawler(&config, args.limit)?;
            let seeds = discover(&crawler, &config).await?;
            scrape(&crawler, &config, seeds).await?;
        }
    }
    Ok(())
}

fn setup_logging(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, quiet))
        .with_target(false)
        .init();
}

/// `RUST_LOG` wins over the verbosity flags.
fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("vlr_stats_crawler=info,warn"),
                1 => EnvFilter::new("vlr_stats_crawler=debug,info"),
                _ => EnvFilter::new("vlr_stats_crawler=trace,debug"),
            }
        }
    })
}

fn build_crawler(config: &CrawlerConfig, limit: Option<usize>) -> anyhow::Result<Crawler> {
    let client = VlrClient::from_config(config).context("building http client")?;
    Ok(Crawler::new(client, config).with_limit(limit))
}

async fn discover(crawler: &Crawler, config: &CrawlerConfig) -> anyhow::Result<Vec<String>> {
    let urls = crawler.discover().await?;
    write_seeds(&config.paths.urls, &urls)?;
    tracing::info!(
        count = urls.len(),
        path = %config.paths.urls.display(),
        "wrote match urls"
    );
    Ok(urls)
}

async fn scrape(crawler: &Crawler, config: &CrawlerConfig, seeds: Vec<String>) -> anyhow::Result<()> {
    let mut log = CompletionLog::open(&config.paths.completion_log)?;
    let sink = JsonLinesSink::new(&config.paths.output);
    let summary = crawler.scrape(seeds, &mut log, &sink).await?;
    tracing::info!(
        recorded = summary.recorded,
        already_done = summary.already_done,
        no_data = summary.no_data,
        failed = summary.failed,
        path = %sink.path().display(),
        "done"
    );
    Ok(())
}
