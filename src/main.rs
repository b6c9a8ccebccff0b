//! Sumi-Crawl main entry point
//!
//! This is the command-line interface for the Sumi-Crawl crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_crawl::config::{load_config_with_hash, validate, Config, OutputFormat};
use sumi_crawl::crawler::Scheduler;
use sumi_crawl::output::{generate_markdown_summary, print_report};
use sumi_crawl::storage::open_sink;
use sumi_crawl::url::parse_seed;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Crawl: a bounded, polite, concurrent web crawler
///
/// Sumi-Crawl fetches pages reachable from a seed URL with a fixed pool of
/// workers, honouring robots.txt host exclusions and a hard page budget.
#[derive(Parser, Debug)]
#[command(name = "sumi-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, polite, concurrent web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of URLs to admit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Number of fetch workers
    #[arg(long)]
    workers: Option<usize>,

    /// Wall-clock crawl timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output file or database path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Also write a markdown summary of the run to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and seed without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let seed = parse_seed(&cli.seed).context("Invalid seed URL")?;

    if cli.dry_run {
        handle_dry_run(&config, &seed);
        return Ok(());
    }

    handle_crawl(config, &seed, cli.summary.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_crawl=info,warn"),
            1 => EnvFilter::new("sumi_crawl=debug,info"),
            2 => EnvFilter::new("sumi_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(workers) = cli.workers {
        config.crawler.worker_count = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.crawl_timeout_secs = timeout;
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, seed: &str) {
    println!("=== Sumi-Crawl Dry Run ===\n");

    println!("Seed: {}\n", seed);

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Workers: {}", config.crawler.worker_count);
    println!("  Crawl timeout: {}s", config.crawler.crawl_timeout_secs);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Robots timeout: {}s", config.crawler.robots_timeout_secs);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nLink Filter:");
    println!("  Suffixes: {}", config.filter.valid_suffixes.join(", "));
    println!(
        "  Directory paths: {}",
        if config.filter.allow_directory_paths {
            "allowed"
        } else {
            "rejected"
        }
    );

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Path: {}", config.output.path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, seed: &str, summary: Option<&Path>) -> anyhow::Result<()> {
    let sink = open_sink(&config.output)
        .with_context(|| format!("Failed to open output {}", config.output.path))?;
    let scheduler = Scheduler::with_http(&config, sink).context("Failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, shutting down");
            on_signal.cancel();
        }
    });

    let report = scheduler.run_with_cancellation(seed, cancel).await;

    if report.stored > 0 {
        tracing::info!("Pages written to {}", config.output.path);
    }

    if let Some(path) = summary {
        generate_markdown_summary(&report, path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    print_report(&report);
    Ok(())
}
