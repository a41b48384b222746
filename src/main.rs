//! Kete main entry point
//!
//! This is the command-line interface for the Kete MAP archiver.

use anyhow::Context;
use clap::Parser;
use kete::config::{load_config_with_hash, validate, Config};
use kete::extract::{DocumentTextExtractor, TextExtractor};
use kete::state::{LastRun, RunKind};
use kete::update::{run_periodic, HttpUpdater};
use kete::UpdateOutcome;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Kete: an offline archive of the Work and Income MAP manual
///
/// Kete mirrors the manual's HTML pages and PDFs to disk, extracts text
/// from the PDFs, and refreshes the archive when it goes stale.
#[derive(Parser, Debug)]
#[command(name = "kete")]
#[command(version)]
#[command(about = "Offline archiver for the Work and Income MAP manual", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Archive directory, overriding the configuration
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Re-archive now, even if the archive is current
    #[arg(long, conflicts_with_all = ["schedule", "extract", "status", "dry_run"])]
    scrape: bool,

    /// Crawl category by category from the navigation page
    #[arg(long)]
    nav_only: bool,

    /// Keep running and update every --days days
    #[arg(long, conflicts_with_all = ["extract", "status", "dry_run"])]
    schedule: bool,

    /// Update interval in days for --schedule
    #[arg(long, value_name = "N", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    days: u64,

    /// Extract text from a single PDF and print it
    #[arg(long, value_name = "FILE", conflicts_with_all = ["status", "dry_run"])]
    extract: Option<PathBuf>,

    /// Show when the archive was last updated and exit
    #[arg(long, conflicts_with = "dry_run")]
    status: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(pdf) = &cli.extract {
        handle_extract(pdf)?;
        return Ok(());
    }

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, cli.nav_only);
    } else if cli.status {
        handle_status(&config);
    } else if cli.schedule {
        handle_schedule(config, cli.days, cli.nav_only).await?;
    } else {
        handle_update(config, cli.scrape, cli.nav_only).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kete=info,warn"),
            1 => EnvFilter::new("kete=debug,info"),
            2 => EnvFilter::new("kete=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn load(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.archive.output_dir = output.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, nav_only: bool) {
    println!("=== Kete Dry Run ===\n");

    println!("Archive:");
    println!("  Output directory: {}", config.archive.output_dir);
    println!("  Start URL: {}", config.archive.start_url);

    println!("\nCrawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Max age: {} days", config.crawler.max_age_days);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
    if nav_only {
        println!(
            "✓ Would crawl each category linked from {}",
            config.archive.start_url
        );
    } else {
        println!(
            "✓ Would crawl every page on the domain of {}",
            config.archive.start_url
        );
    }
}

/// Handles the --status mode: reports the age of both archives
fn handle_status(config: &Config) {
    let root = Path::new(&config.archive.output_dir);
    println!("Archive: {}\n", root.display());

    for kind in [RunKind::FullSite, RunKind::Category] {
        let last_run = LastRun::for_kind(root, kind);
        let when = last_run
            .read_datetime()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "Never".to_string());
        println!("Last {} update: {}", kind.label(), when);
    }

    let full_site = LastRun::for_kind(root, RunKind::FullSite);
    if full_site.needs_update(config.crawler.max_age_days) {
        println!(
            "\n⚠ Archive is older than {} days (or missing); run with --scrape to refresh",
            config.crawler.max_age_days
        );
    } else {
        println!("\n✓ Archive is current");
    }
}

/// Handles the --extract mode: prints the text of one PDF or image
fn handle_extract(pdf: &Path) -> anyhow::Result<()> {
    let metadata = std::fs::metadata(pdf)
        .with_context(|| format!("Cannot read {}", pdf.display()))?;
    anyhow::ensure!(metadata.is_file(), "{} is not a file", pdf.display());

    let text = DocumentTextExtractor::new().extract(pdf);
    if text.is_empty() {
        println!(
            "No text could be extracted from {}. Scanned documents need tesseract and pdftoppm installed.",
            pdf.display()
        );
    } else {
        println!("{}", text);
    }

    Ok(())
}

/// Handles the one-shot update: forced with --scrape, otherwise only if stale
async fn handle_update(
    config: Config,
    force: bool,
    nav_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let updater = HttpUpdater::from_config(config)?;

    let outcome = if nav_only {
        updater.run_category_update(force).await
    } else {
        updater.run_update(force).await
    };

    match outcome {
        Ok(UpdateOutcome::Updated {
            kind,
            categories,
            crawl,
            extraction,
            ..
        }) => {
            tracing::info!(
                "{} update finished: {} pages, {} new PDFs, {} failures, {} texts extracted",
                kind.label(),
                crawl.html_saved,
                crawl.pdfs_saved,
                crawl.failures,
                extraction.extracted
            );
            if !categories.is_empty() {
                tracing::info!("Categories crawled: {}", categories.len());
            }
            Ok(())
        }
        Ok(UpdateOutcome::AlreadyCurrent) => {
            println!("Archive is current; use --scrape to refresh anyway");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Update failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --schedule mode: periodic updates until ctrl-c
async fn handle_schedule(
    config: Config,
    days: u64,
    nav_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let updater = HttpUpdater::from_config(config)?;
    let kind = if nav_only {
        RunKind::Category
    } else {
        RunKind::FullSite
    };

    tokio::select! {
        _ = run_periodic(&updater, days, kind) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Interrupted, stopping periodic updates");
        }
    }

    Ok(())
}
