//! Scheduler: worker pool lifecycle and the termination decision
//!
//! This module handles:
//! - Seeding a fresh frontier for each run
//! - Spawning a fixed pool of fetch workers
//! - Waiting for the frontier's fixed point (nothing pending, nothing in flight)
//! - Enforcing the wall-clock crawl timeout and external cancellation
//! - Draining workers and building the run report

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkParser, LinkParser};
use crate::crawler::worker::{FetchWorker, WorkerContext};
use crate::output::{CrawlReport, CrawlStats, Termination};
use crate::robots::RobotsGate;
use crate::storage::PageSink;
use crate::url::UrlFilter;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Owns the collaborators and runs crawls over a fixed worker pool
///
/// The robots gate lives as long as the scheduler, so exclusion decisions
/// survive across runs.
pub struct Scheduler {
    config: CrawlerConfig,
    filter: UrlFilter,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn LinkParser>,
    sink: Arc<dyn PageSink>,
    robots: Arc<RobotsGate>,
}

impl Scheduler {
    /// Creates a scheduler over explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Full configuration (crawler limits, user agent, link filter)
    /// * `fetcher` - Transport for pages and robots.txt
    /// * `parser` - Link extractor
    /// * `sink` - Destination for fetched pages
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn LinkParser>,
        sink: Arc<dyn PageSink>,
    ) -> Self {
        let robots = Arc::new(RobotsGate::new(
            Arc::clone(&fetcher),
            config.user_agent.crawler_name.clone(),
            config.crawler.robots_timeout(),
        ));

        Self {
            config: config.crawler.clone(),
            filter: UrlFilter::new(&config.filter),
            fetcher,
            parser,
            sink,
            robots,
        }
    }

    /// Creates a scheduler using the reqwest fetcher and HTML link parser
    pub fn with_http(config: &Config, sink: Arc<dyn PageSink>) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.crawler.fetch_timeout())?;
        Ok(Self::new(
            config,
            Arc::new(fetcher),
            Arc::new(HtmlLinkParser),
            sink,
        ))
    }

    pub fn robots(&self) -> &RobotsGate {
        &self.robots
    }

    /// Crawls from `seed` until the frontier is exhausted or the timeout hits
    pub async fn run(&self, seed: &str) -> CrawlReport {
        self.run_with_cancellation(seed, CancellationToken::new())
            .await
    }

    /// Like `run`, but also stops when `cancel` is triggered
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use sumi_crawl::config::Config;
    /// use sumi_crawl::crawler::Scheduler;
    /// use sumi_crawl::storage::MemorySink;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let scheduler = Scheduler::with_http(&Config::default(), Arc::new(MemorySink::new()))?;
    /// let cancel = CancellationToken::new();
    /// let report = scheduler
    ///     .run_with_cancellation("https://example.com/", cancel)
    ///     .await;
    /// println!("Stored {} pages", report.stored);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_with_cancellation(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> CrawlReport {
        let started_at = Utc::now();
        let frontier = Arc::new(Frontier::new(self.config.max_pages));
        let stats = Arc::new(CrawlStats::new());

        let seeded = frontier.seed_urls([seed]);
        tracing::info!(
            "Starting crawl from {} with {} workers, budget {} pages",
            seed,
            self.config.worker_count,
            self.config.max_pages
        );
        if seeded == 0 {
            tracing::warn!("Seed {} was not admitted", seed);
        }

        let ctx = Arc::new(WorkerContext {
            frontier: Arc::clone(&frontier),
            robots: Arc::clone(&self.robots),
            fetcher: Arc::clone(&self.fetcher),
            parser: Arc::clone(&self.parser),
            sink: Arc::clone(&self.sink),
            filter: self.filter.clone(),
            stats: Arc::clone(&stats),
            fetch_timeout: self.config.fetch_timeout(),
            idle_backoff: self.config.idle_backoff(),
            progress_interval: self.config.progress_interval.max(1),
        });

        let stop_workers = cancel.child_token();
        let mut workers = JoinSet::new();
        for id in 0..self.config.worker_count.max(1) {
            let worker = FetchWorker::new(id, Arc::clone(&ctx));
            workers.spawn(worker.run(stop_workers.clone()));
        }

        let termination = tokio::select! {
            _ = frontier.wait_until_done() => Termination::Exhausted,
            _ = tokio::time::sleep(self.config.crawl_timeout()) => Termination::TimedOut,
            _ = cancel.cancelled() => Termination::Cancelled,
        };

        match termination {
            Termination::Exhausted => tracing::info!("Frontier is empty, crawl complete"),
            Termination::TimedOut => tracing::warn!(
                "Crawl timeout of {:?} reached, stopping workers",
                self.config.crawl_timeout()
            ),
            Termination::Cancelled => tracing::info!("Crawl cancelled, stopping workers"),
        }

        stop_workers.cancel();
        self.drain(&mut workers).await;

        if let Err(e) = self.sink.flush() {
            tracing::error!("Failed to flush sink: {}", e);
        }

        let report = CrawlReport::new(
            seed,
            started_at,
            termination,
            frontier.snapshot(),
            &stats,
            self.robots.hosts_checked(),
        );

        tracing::info!(
            "Crawl finished ({}): {} stored, {} disallowed, {} failed in {:.1}s",
            report.termination,
            report.stored,
            report.disallowed,
            report.failed,
            report.duration_seconds()
        );

        report
    }

    /// Lets workers finish their current URL, then aborts stragglers
    async fn drain(&self, workers: &mut JoinSet<()>) {
        let grace = self.config.shutdown_grace();
        if tokio::time::timeout(grace, join_all(workers)).await.is_err() {
            tracing::warn!(
                "{} workers still busy after {:?}, aborting",
                workers.len(),
                grace
            );
            workers.abort_all();
            join_all(workers).await;
        }
    }
}

async fn join_all(workers: &mut JoinSet<()>) {
    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!("Worker panicked: {}", e);
            }
        }
    }
}
