//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier (dedup, admission budget, in-flight accounting)
//! - HTTP fetching and HTML link extraction
//! - The fetch worker loop
//! - The scheduler that runs the worker pool and decides when to stop

mod fetcher;
mod frontier;
mod parser;
mod scheduler;
mod worker;

pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierSnapshot};
pub use parser::{extract_links, HtmlLinkParser, LinkParser, ParseError};
pub use scheduler::Scheduler;
pub use worker::{FetchWorker, PageOutcome, WorkerContext};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::storage::open_sink;
use crate::url::parse_seed;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed URL
/// 2. Open the configured page sink
/// 3. Build the HTTP fetcher and robots gate
/// 4. Run the worker pool until the frontier is exhausted or the timeout hits
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Absolute http(s) URL to start from
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl ran to a termination condition
/// * `Err(CrawlError)` - The seed, sink or HTTP client could not be set up
pub async fn crawl(config: &Config, seed: &str) -> Result<CrawlReport> {
    let seed = parse_seed(seed)?;
    let sink = open_sink(&config.output)?;
    let scheduler = Scheduler::with_http(config, sink)?;
    Ok(scheduler.run(&seed).await)
}
