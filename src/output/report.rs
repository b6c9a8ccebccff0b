//! End-of-run crawl report

use crate::crawler::FrontierSnapshot;
use crate::output::stats::{CrawlStats, FailedUrl};
use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::fmt;

/// Why the scheduler stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Nothing pending and nothing in flight
    Exhausted,
    /// The wall-clock crawl timeout elapsed first
    TimedOut,
    /// An external stop request arrived
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exhausted => "frontier exhausted",
            Self::TimedOut => "timed out",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub termination: Termination,
    /// URLs ever admitted to the frontier
    pub admitted: usize,
    /// Admission budget
    pub budget: usize,
    /// URLs admitted but never claimed (only non-zero after timeout/cancel)
    pub unclaimed: usize,
    /// URLs whose processing completed
    pub completed: usize,
    pub stored: usize,
    pub store_failed: usize,
    pub disallowed: usize,
    pub fetch_failed: usize,
    /// URLs whose body was retrieved, stored or not
    pub fetched: usize,
    /// URLs that ended in an error state
    pub failed: usize,
    pub links_discovered: usize,
    pub links_rejected: usize,
    /// Discovered links that entered the frontier
    pub links_admitted: usize,
    pub hosts_checked: usize,
    pub failures: Vec<FailedUrl>,
}

impl CrawlReport {
    pub(crate) fn new(
        seed: &str,
        started_at: DateTime<Utc>,
        termination: Termination,
        frontier: FrontierSnapshot,
        stats: &CrawlStats,
        hosts_checked: usize,
    ) -> Self {
        let total = |keep: fn(&PageState) -> bool| -> usize {
            PageState::all_states()
                .iter()
                .filter(|state| keep(state))
                .map(|state| stats.count(*state))
                .sum()
        };

        Self {
            seed: seed.to_string(),
            started_at,
            finished_at: Utc::now(),
            termination,
            admitted: frontier.admitted,
            budget: frontier.budget,
            unclaimed: frontier.pending,
            completed: stats.completed(),
            stored: stats.count(PageState::Stored),
            store_failed: stats.count(PageState::StoreFailed),
            disallowed: stats.count(PageState::Disallowed),
            fetch_failed: stats.count(PageState::FetchFailed),
            fetched: total(PageState::was_fetched),
            failed: total(PageState::is_error),
            links_discovered: stats.links_discovered(),
            links_rejected: stats.links_rejected(),
            links_admitted: stats.links_admitted(),
            hosts_checked,
            failures: stats.failures(),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Pages fetched (stored or not) per second of wall-clock time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.duration_seconds();
        if secs > 0.0 {
            self.fetched as f64 / secs
        } else {
            0.0
        }
    }

    pub fn budget_exhausted(&self) -> bool {
        self.admitted >= self.budget
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Seed: {}", report.seed);
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {:.1}s", report.duration_seconds());
    println!("  Stopped because: {}", report.termination);
    println!();

    println!("Frontier:");
    println!("  Admitted: {} / {}", report.admitted, report.budget);
    if report.unclaimed > 0 {
        println!("  Never claimed: {}", report.unclaimed);
    }
    println!("  Links discovered: {}", report.links_discovered);
    println!("  Links rejected by filter: {}", report.links_rejected);
    println!("  Links admitted: {}", report.links_admitted);
    println!("  Hosts checked for robots.txt: {}", report.hosts_checked);
    println!();

    println!("Pages:");
    println!("  Stored: {}", report.stored);
    println!("  Disallowed by robots.txt: {}", report.disallowed);
    println!("  Fetch failed: {}", report.fetch_failed);
    println!("  Store failed: {}", report.store_failed);
    println!("  Total failed: {}", report.failed);
    println!("  Rate: {:.2} pages/sec", report.pages_per_second());

    if !report.failures.is_empty() {
        println!("\nFailures ({}):", report.failures.len());
        for failure in &report.failures {
            println!(
                "  - [{}:{}] {} ({})",
                failure.state, failure.kind, failure.url, failure.detail
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FrontierSnapshot {
        FrontierSnapshot {
            admitted: 3,
            pending: 0,
            in_flight: 0,
            budget: 3,
            done: true,
        }
    }

    #[test]
    fn test_report_from_stats() {
        let stats = CrawlStats::new();
        stats.record_completion(PageState::Stored);
        stats.record_completion(PageState::Stored);
        stats.record_completion(PageState::FetchFailed);
        stats.record_completion(PageState::StoreFailed);
        stats.record_completion(PageState::Disallowed);
        stats.record_links(5, 1, 2);

        let report = CrawlReport::new(
            "https://example.com/",
            Utc::now(),
            Termination::Exhausted,
            snapshot(),
            &stats,
            1,
        );

        assert_eq!(report.completed, 5);
        assert_eq!(report.stored, 2);
        assert_eq!(report.fetch_failed, 1);
        assert_eq!(report.fetched, 3);
        assert_eq!(report.failed, 2);
        assert_eq!(report.links_discovered, 5);
        assert_eq!(report.links_admitted, 2);
        assert!(report.budget_exhausted());
        assert!(report.duration_seconds() >= 0.0);
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::Exhausted.to_string(), "frontier exhausted");
        assert_eq!(Termination::TimedOut.to_string(), "timed out");
    }
}
