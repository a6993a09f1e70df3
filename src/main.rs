//! Reel Harvest main entry point
//!
//! This is the command-line interface for the Reel Harvest scraper.

use anyhow::{bail, Context};
use clap::Parser;
use reel_harvest::config::{load_or_default, Config};
use reel_harvest::crawler::{harvest, HarvestSummary, HttpFetcher, PageFetcher};
use reel_harvest::storage::open_storage;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Reel Harvest: scrape the Douban Top 250 into SQLite
///
/// Fetches every listing page concurrently, extracts one record per movie
/// and stores it in the `douban_movies` table. Runs with built-in defaults
/// when no configuration file is given.
#[derive(Parser, Debug)]
#[command(name = "reel-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Concurrent movie-ranking scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the pages that would be fetched without fetching them
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show how many records the database holds and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    match &cli.config {
        Some(path) => tracing::info!("Configuration loaded from {}", path.display()),
        None => tracing::info!("No configuration file given, using built-in defaults"),
    }

    if cli.dry_run {
        return handle_dry_run(&config);
    }
    if cli.stats {
        return handle_stats(&config);
    }

    let summary = harvest(&config).await?;
    report(&summary);

    println!("cost=[{:?}]", start.elapsed());

    if !summary.is_success() {
        bail!(
            "{} of {} pages failed",
            summary.failures.len(),
            summary.pages
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_harvest=info,warn"),
            1 => EnvFilter::new("reel_harvest=debug,info"),
            2 => EnvFilter::new("reel_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.request)?;
    let offsets = config.page_offsets();

    println!("=== Reel Harvest Dry Run ===\n");

    println!("Pages ({}):", offsets.len());
    for offset in &offsets {
        println!("  - {}", fetcher.page_url(*offset));
    }

    println!("\nRequest headers ({}):", config.request.headers.len());
    for (name, value) in &config.request.headers {
        println!("  {}: {}", name, value);
    }

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);
    println!(
        "  Connections: max {} open, {} idle",
        config.storage.max_open_connections, config.storage.max_idle_connections
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: shows the stored record count
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(&config.storage)?;
    let count = storage.count_records()?;

    println!("Database: {}", config.storage.database_path);
    println!("Records: {}", count);
    Ok(())
}

/// Logs the run summary, one line per failed page
fn report(summary: &HarvestSummary) {
    tracing::info!(
        "Harvest finished: {}/{} pages, {} records extracted, {} saved, {} failed",
        summary.pages_succeeded(),
        summary.pages,
        summary.records_extracted,
        summary.records_saved,
        summary.records_failed
    );

    for failure in &summary.failures {
        tracing::error!("Page {} failed: {}", failure.offset, failure.error);
    }
}
