//! Nisbets scraper entry point
//!
//! Runs the scraping pipeline from a TOML configuration file. The
//! default mode auto-starts a batch (if configured) and then re-runs one
//! every `interval-minutes`; `--crawl` runs URL discovery instead, and
//! `--once` runs a single batch and exits.

use anyhow::Context;
use clap::Parser;
use nisbets_scraper::config::load_config;
use nisbets_scraper::Pipeline;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Resumable product scraper for nisbets.co.uk
#[derive(Parser, Debug)]
#[command(name = "nisbets-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Checkpointed product scraping pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a URL discovery crawl instead of product batches
    #[arg(long, conflicts_with_all = ["once", "dry_run"])]
    crawl: bool,

    /// Run a single batch and exit instead of scheduling
    #[arg(long, conflicts_with = "dry_run")]
    once: bool,

    /// Override the configured batch size
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    /// Validate config and show what would run without running it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        print_plan(&config, cli.batch_size);
        return Ok(());
    }

    config
        .ensure_data_dirs()
        .context("failed to create data directories")?;

    let pipeline = Pipeline::new(config);

    if cli.crawl {
        pipeline.run_discovery(None).await?;
        return Ok(());
    }

    if cli.once {
        pipeline.run_batch(cli.batch_size).await?;
        return Ok(());
    }

    run_scheduled(pipeline, cli.batch_size).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("nisbets_scraper=info,warn"),
            1 => EnvFilter::new("nisbets_scraper=debug,info"),
            2 => EnvFilter::new("nisbets_scraper=trace,debug"),
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

/// Auto-start plus periodic batches, skipping ticks while a run is active
async fn run_scheduled(pipeline: Pipeline, batch_size: Option<usize>) -> anyhow::Result<()> {
    let interval_minutes = pipeline.config().scraper.interval_minutes;
    let auto_start = pipeline.config().scraper.auto_start;

    if auto_start {
        tracing::info!("Auto-starting first batch");
        run_one(&pipeline, batch_size).await;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ticker.tick().await; // first tick completes immediately

    loop {
        ticker.tick().await;
        run_one(&pipeline, batch_size).await;
    }
}

/// Runs one batch, logging instead of exiting on failure so the
/// schedule keeps going
async fn run_one(pipeline: &Pipeline, batch_size: Option<usize>) {
    match pipeline.run_batch(batch_size).await {
        Ok(true) => {
            let status = pipeline.status();
            tracing::info!(
                "Batch done: {}/{} URLs, {} products, {} failed",
                status.current_index,
                status.total_urls,
                status.products_scraped,
                status.failed_count
            );
        }
        Ok(false) => tracing::info!("Previous run still active, skipped this tick"),
        Err(e) => tracing::error!("Batch failed: {}", e),
    }
}

/// Handles the --dry-run mode: validates config and shows the plan
fn print_plan(config: &nisbets_scraper::Config, batch_size: Option<usize>) {
    println!("=== Nisbets Scraper Dry Run ===\n");

    println!("Target:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Data dir: {}", config.scraper.data_dir.display());

    println!("\nBatches:");
    println!(
        "  Batch size: {}",
        batch_size.unwrap_or(config.scraper.batch_size)
    );
    println!("  Interval: every {} minutes", config.scraper.interval_minutes);
    println!("  Auto-start: {}", config.scraper.auto_start);
    println!(
        "  Fetch: {} retries, {}s timeout",
        config.scraper.fetch_retries, config.scraper.fetch_timeout_secs
    );

    println!("\nDiscovery crawl:");
    println!("  Page budget: {}", config.crawl.max_pages);
    println!("  Save every: {} pages", config.crawl.save_every);

    println!("\nDashboard layer:");
    println!("  Port: {}", config.server.port);

    println!("\n✓ Configuration is valid");
}
