//! Live crawl statistics
//!
//! Workers record every completed URL here. Counters are atomics; the list of
//! failures sits behind a mutex because it is append-only and read once at
//! the end of the run.

use crate::state::PageState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// An abandoned or partially processed URL, attributable for observability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    /// The URL that failed
    pub url: String,
    /// Final state of the URL (`FetchFailed` or `StoreFailed`)
    pub state: PageState,
    /// Short failure class (e.g. "timeout", "status", "io")
    pub kind: String,
    /// Human readable detail
    pub detail: String,
}

/// Counters shared by all workers of one run
#[derive(Debug, Default)]
pub struct CrawlStats {
    completed: AtomicUsize,
    stored: AtomicUsize,
    store_failed: AtomicUsize,
    disallowed: AtomicUsize,
    fetch_failed: AtomicUsize,
    links_discovered: AtomicUsize,
    links_rejected: AtomicUsize,
    links_admitted: AtomicUsize,
    failures: Mutex<Vec<FailedUrl>>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the final state of a URL
    ///
    /// # Returns
    ///
    /// Total URLs completed so far, including this one
    pub fn record_completion(&self, state: PageState) -> usize {
        let counter = match state {
            PageState::Stored => &self.stored,
            PageState::StoreFailed => &self.store_failed,
            PageState::Disallowed => &self.disallowed,
            PageState::FetchFailed => &self.fetch_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Attributes a failure to a URL
    pub fn record_failure(&self, failure: FailedUrl) {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        failures.push(failure);
    }

    /// Records what happened to the links found on one page
    pub fn record_links(&self, discovered: usize, rejected: usize, admitted: usize) {
        self.links_discovered.fetch_add(discovered, Ordering::Relaxed);
        self.links_rejected.fetch_add(rejected, Ordering::Relaxed);
        self.links_admitted.fetch_add(admitted, Ordering::Relaxed);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn count(&self, state: PageState) -> usize {
        match state {
            PageState::Stored => self.stored.load(Ordering::Relaxed),
            PageState::StoreFailed => self.store_failed.load(Ordering::Relaxed),
            PageState::Disallowed => self.disallowed.load(Ordering::Relaxed),
            PageState::FetchFailed => self.fetch_failed.load(Ordering::Relaxed),
        }
    }

    pub fn links_discovered(&self) -> usize {
        self.links_discovered.load(Ordering::Relaxed)
    }

    pub fn links_rejected(&self) -> usize {
        self.links_rejected.load(Ordering::Relaxed)
    }

    pub fn links_admitted(&self) -> usize {
        self.links_admitted.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> Vec<FailedUrl> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
