//! Output module for crawl statistics and reports
//!
//! This module handles:
//! - Recording live per-run statistics from the workers
//! - Building the end-of-run `CrawlReport`
//! - Printing the report and rendering it as markdown

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{print_report, CrawlReport, Termination};
pub use stats::{CrawlStats, FailedUrl};
