use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Crawl
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Upper bound on the number of URLs ever admitted to the frontier
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Number of fetch workers in the pool
    #[serde(rename = "worker-count")]
    pub worker_count: usize,

    /// Wall-clock bound on the whole crawl (seconds)
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: u64,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Timeout for a robots.txt lookup (seconds)
    #[serde(rename = "robots-timeout-secs")]
    pub robots_timeout_secs: u64,

    /// Longest an idle worker sleeps before polling the frontier again (milliseconds)
    #[serde(rename = "idle-backoff-ms")]
    pub idle_backoff_ms: u64,

    /// Log a progress line every this many completed URLs
    #[serde(rename = "progress-interval")]
    pub progress_interval: usize,

    /// How long stopping workers may finish their current URL before being aborted (milliseconds)
    #[serde(rename = "shutdown-grace-ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 6000,
            worker_count: 5,
            crawl_timeout_secs: 600,
            fetch_timeout_secs: 30,
            robots_timeout_secs: 10,
            idle_backoff_ms: 200,
            progress_interval: 50,
            shutdown_grace_ms: 5000,
        }
    }
}

impl CrawlerConfig {
    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_secs(self.robots_timeout_secs)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used to select robots.txt groups
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiCrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/bot".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Validity predicate for discovered links
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Path suffixes that denote a crawlable document (e.g. ".html")
    #[serde(rename = "valid-suffixes")]
    pub valid_suffixes: Vec<String>,

    /// Whether directory-style paths (ending in "/") are crawlable
    #[serde(rename = "allow-directory-paths")]
    pub allow_directory_paths: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            valid_suffixes: vec![".html".to_string()],
            allow_directory_paths: true,
        }
    }
}

/// Where fetched pages are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Append-only text file
    Text,
    /// SQLite `pages` table
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sink format
    pub format: OutputFormat,

    /// Path of the output file or database
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            path: "crawled_pages.txt".to_string(),
        }
    }
}
