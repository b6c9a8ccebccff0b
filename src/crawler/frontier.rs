//! Crawl frontier: admission control and deduplicated work distribution
//!
//! All shared crawl state lives here behind a single mutex:
//! - the seen-set of every URL ever admitted
//! - the FIFO queue of admitted URLs not yet claimed
//! - the number of claimed URLs whose processing has not completed
//!
//! Admission (`offer`), claiming (`try_claim`) and completion (`complete`) are
//! each one critical section, so no two workers can both observe a URL as new,
//! and completion can never be declared while a claimed URL may still produce
//! offers.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct FrontierState {
    seen: HashSet<String>,
    pending: VecDeque<String>,
    in_flight: usize,
    /// Set the first time the frontier is observed drained; never cleared
    closed: bool,
}

impl FrontierState {
    fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight == 0
    }
}

/// Point-in-time view of the frontier counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierSnapshot {
    /// URLs ever admitted (size of the seen-set)
    pub admitted: usize,
    /// URLs waiting to be claimed
    pub pending: usize,
    /// URLs claimed but not yet completed
    pub in_flight: usize,
    /// Maximum number of admissions
    pub budget: usize,
    /// Whether the crawl has reached its fixed point
    pub done: bool,
}

/// Concurrent, deduplicated, budgeted work queue
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    budget: usize,
    /// Wakes idle workers when a URL is admitted or the frontier closes
    work_available: Notify,
    /// Wakes the scheduler when the frontier may have drained
    drained: Notify,
}

impl Frontier {
    /// Creates an empty frontier that will admit at most `budget` URLs
    pub fn new(budget: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            budget,
            work_available: Notify::new(),
            drained: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // Every critical section leaves the state consistent, so a panic in
        // another holder does not invalidate it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Admits each absent URL while budget remains
    ///
    /// # Returns
    ///
    /// The number of URLs admitted
    pub fn seed_urls<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut admitted = 0;
        for url in urls {
            if self.offer(url) {
                admitted += 1;
            }
        }
        admitted
    }

    /// Atomically admits a URL if it is unseen and budget remains
    ///
    /// # Returns
    ///
    /// * `true` - The URL was added to the seen-set and the pending queue
    /// * `false` - Duplicate, budget exhausted, or crawl already finished; no-op
    pub fn offer(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        {
            let mut state = self.lock();
            if state.closed || state.seen.len() >= self.budget || state.seen.contains(&url) {
                return false;
            }
            state.seen.insert(url.clone());
            state.pending.push_back(url);
        }
        self.work_available.notify_one();
        true
    }

    /// Removes and returns the oldest pending URL without blocking
    ///
    /// A returned URL counts as in flight until `complete` is called.
    pub fn try_claim(&self) -> Option<String> {
        let mut state = self.lock();
        let url = state.pending.pop_front()?;
        state.in_flight += 1;
        Some(url)
    }

    /// Marks one claimed URL as fully processed, whatever its outcome
    pub fn complete(&self) {
        let drained = {
            let mut state = self.lock();
            debug_assert!(state.in_flight > 0, "complete() without a matching claim");
            state.in_flight = state.in_flight.saturating_sub(1);
            state.is_drained()
        };
        if drained {
            self.drained.notify_waiters();
            self.work_available.notify_waiters();
        }
    }

    /// True once nothing is pending and nothing is in flight
    ///
    /// The first `true` closes the frontier: later offers are rejected, so the
    /// answer never flips back to `false`.
    pub fn is_done(&self) -> bool {
        let mut state = self.lock();
        if !state.closed && state.is_drained() {
            state.closed = true;
        }
        state.closed
    }

    /// Resolves once `is_done` would return true
    pub async fn wait_until_done(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a completion between the check and
            // the await is not lost.
            notified.as_mut().enable();
            if self.is_done() {
                return;
            }
            notified.await;
        }
    }

    /// Parks an idle worker until new work may exist, for at most `backoff`
    pub async fn wait_for_work(&self, backoff: Duration) {
        let _ = tokio::time::timeout(backoff, self.work_available.notified()).await;
    }

    /// Whether the admission budget has been used up
    pub fn is_budget_exhausted(&self) -> bool {
        self.lock().seen.len() >= self.budget
    }

    /// Whether a URL has ever been admitted
    pub fn contains(&self, url: &str) -> bool {
        self.lock().seen.contains(url)
    }

    /// Number of URLs ever admitted
    pub fn admitted_count(&self) -> usize {
        self.lock().seen.len()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn snapshot(&self) -> FrontierSnapshot {
        let state = self.lock();
        FrontierSnapshot {
            admitted: state.seen.len(),
            pending: state.pending.len(),
            in_flight: state.in_flight,
            budget: self.budget,
            done: state.closed,
        }
    }
}
