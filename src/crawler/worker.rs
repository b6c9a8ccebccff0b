//! Fetch worker: the claim → gate → fetch → expand → store loop
//!
//! Each pool slot runs one `FetchWorker`. Processing of a claimed URL always
//! ends with exactly one `Frontier::complete` call, whatever the outcome.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::LinkParser;
use crate::output::{CrawlStats, FailedUrl};
use crate::robots::RobotsGate;
use crate::state::PageState;
use crate::storage::{PageSink, StorageError};
use crate::url::UrlFilter;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Everything a worker needs, shared by the whole pool
pub struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub robots: Arc<RobotsGate>,
    pub fetcher: Arc<dyn Fetcher>,
    pub parser: Arc<dyn LinkParser>,
    pub sink: Arc<dyn PageSink>,
    pub filter: UrlFilter,
    pub stats: Arc<CrawlStats>,
    pub fetch_timeout: Duration,
    pub idle_backoff: Duration,
    pub progress_interval: usize,
}

/// Result of processing one claimed URL
#[derive(Debug)]
pub enum PageOutcome {
    /// Page fetched and stored; `admitted` new links entered the frontier
    Stored { admitted: usize },
    /// Host excluded by robots.txt
    Disallowed,
    /// Fetch failed; the URL is abandoned for this run
    FetchFailed(FetchError),
    /// Page fetched and expanded, but the sink rejected it
    StoreFailed(StorageError),
}

impl PageOutcome {
    pub fn state(&self) -> PageState {
        match self {
            Self::Stored { .. } => PageState::Stored,
            Self::Disallowed => PageState::Disallowed,
            Self::FetchFailed(_) => PageState::FetchFailed,
            Self::StoreFailed(_) => PageState::StoreFailed,
        }
    }

    fn failure(&self, url: &str) -> Option<FailedUrl> {
        let (kind, detail) = match self {
            Self::FetchFailed(e) => (e.kind(), e.to_string()),
            Self::StoreFailed(e) => ("store", e.to_string()),
            Self::Stored { .. } | Self::Disallowed => return None,
        };
        Some(FailedUrl {
            url: url.to_string(),
            state: self.state(),
            kind: kind.to_string(),
            detail,
        })
    }
}

pub struct FetchWorker {
    id: usize,
    ctx: Arc<WorkerContext>,
}

impl FetchWorker {
    pub fn new(id: usize, ctx: Arc<WorkerContext>) -> Self {
        Self { id, ctx }
    }

    /// Runs until cancelled or until the frontier is done
    pub async fn run(self, cancel: CancellationToken) {
        let span = tracing::debug_span!("worker", id = self.id);
        self.run_loop(cancel).instrument(span).await
    }

    async fn run_loop(self, cancel: CancellationToken) {
        tracing::debug!("Worker started");
        let frontier = &self.ctx.frontier;

        loop {
            if cancel.is_cancelled() {
                tracing::debug!("Worker cancelled");
                break;
            }

            let Some(url) = frontier.try_claim() else {
                if frontier.is_done() {
                    break;
                }
                tracing::trace!("Frontier empty, idling");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = frontier.wait_for_work(self.ctx.idle_backoff) => {}
                }
                continue;
            };

            let outcome = self.process(&url).await;
            self.record(&url, &outcome);
            frontier.complete();
        }

        tracing::debug!("Worker stopped");
    }

    /// Processes one claimed URL
    ///
    /// The only await points are the robots lookup and the fetch, so once a
    /// page has been fetched its expansion and storage happen without
    /// interruption.
    pub async fn process(&self, url: &str) -> PageOutcome {
        if !self.ctx.robots.is_allowed(url).await {
            tracing::debug!("Disallowed by robots.txt: {}", url);
            return PageOutcome::Disallowed;
        }

        let fetched =
            match tokio::time::timeout(self.ctx.fetch_timeout, self.ctx.fetcher.fetch(url)).await {
                Ok(Ok(page)) => page,
                Ok(Err(e)) => return PageOutcome::FetchFailed(e),
                Err(_) => return PageOutcome::FetchFailed(FetchError::Timeout),
            };
        tracing::debug!("Fetched {} ({} bytes)", url, fetched.body.len());

        let admitted = self.expand(url, &fetched.body);

        match self.ctx.sink.store(url, &fetched.body) {
            Ok(()) => PageOutcome::Stored { admitted },
            Err(e) => PageOutcome::StoreFailed(e),
        }
    }

    /// Offers every valid link on the page to the frontier
    ///
    /// # Returns
    ///
    /// The number of links admitted
    fn expand(&self, url: &str, body: &[u8]) -> usize {
        let links = match self.ctx.parser.parse(url, body) {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", url, e);
                Vec::new()
            }
        };

        let mut rejected = 0;
        let mut admitted = 0;
        for link in &links {
            if !self.ctx.filter.is_valid(link) {
                rejected += 1;
                continue;
            }
            if self.ctx.frontier.offer(link.as_str()) {
                admitted += 1;
            }
        }

        tracing::trace!(
            "{}: {} links, {} rejected, {} admitted",
            url,
            links.len(),
            rejected,
            admitted
        );
        self.ctx.stats.record_links(links.len(), rejected, admitted);
        admitted
    }

    fn record(&self, url: &str, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::FetchFailed(e) => tracing::warn!("Fetch failed for {}: {}", url, e),
            PageOutcome::StoreFailed(e) => tracing::warn!("Failed to store {}: {}", url, e),
            PageOutcome::Stored { .. } => tracing::info!("Crawled: {}", url),
            PageOutcome::Disallowed => {}
        }

        if let Some(failure) = outcome.failure(url) {
            self.ctx.stats.record_failure(failure);
        }

        let completed = self.ctx.stats.record_completion(outcome.state());
        if completed % self.ctx.progress_interval == 0 {
            let snapshot = self.ctx.frontier.snapshot();
            tracing::info!(
                "Progress: {} completed, {} admitted of {}, {} pending, {} in flight",
                completed,
                snapshot.admitted,
                snapshot.budget,
                snapshot.pending,
                snapshot.in_flight
            );
        }
    }
}
