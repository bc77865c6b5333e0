//! Crosstalk main entry point
//!
//! This is the command-line interface for the Crosstalk comment harvester.

use chrono::NaiveDate;
use clap::Parser;
use crosstalk::client::article_url;
use crosstalk::config::{load_config, Config};
use crosstalk::scrape::{scrape, Completion};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crosstalk: a crossword comment harvester
///
/// Crosstalk fetches every comment attached to a dated crossword puzzle
/// from the paginated community comment API and writes one JSON record
/// collection per date.
#[derive(Parser, Debug)]
#[command(name = "crosstalk")]
#[command(version = "1.0.0")]
#[command(about = "A crossword comment harvester", long_about = None)]
struct Cli {
    /// The puzzle date - format YYYY-MM-DD
    #[arg(short, long, value_parser = parse_date)]
    date: NaiveDate,

    /// Maximum number of requests to allow for fetching parent comments
    #[arg(short, long)]
    max_requests: Option<usize>,

    /// Path to TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show what would be scraped without issuing any requests
    #[arg(long)]
    dry_run: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("not a valid date: '{}'", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to the built-in defaults
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.date, cli.max_requests);
        return Ok(());
    }

    tracing::info!("Initialized scraper for URL {}", article_url(cli.date));

    let report = scrape(config, cli.date, cli.max_requests).await?;

    match report.completion {
        Completion::Complete => tracing::info!(
            "Scrape complete: {} parents, {} replies in {} requests -> {}",
            report.parents,
            report.replies,
            report.requests_used,
            report.output_path.display()
        ),
        Completion::Truncated => tracing::warn!(
            "Scrape truncated by request budget: {} parents, {} replies in {} requests -> {}",
            report.parents,
            report.replies,
            report.requests_used,
            report.output_path.display()
        ),
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
            0 => EnvFilter::new("crosstalk=info,warn"),
            1 => EnvFilter::new("crosstalk=debug,info"),
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

/// Handles the --dry-run mode: shows the resolved plan without any requests
fn handle_dry_run(config: &Config, date: NaiveDate, max_requests: Option<usize>) {
    println!("=== Crosstalk Dry Run ===\n");

    println!("Article:");
    println!("  Puzzle date: {}", date.format("%Y-%m-%d"));
    println!("  URL: {}", article_url(date));

    println!("\nAPI:");
    println!("  Endpoint: {}", config.api.endpoint);
    println!("  Page size: {}", config.api.page_size);
    println!(
        "  Reply follow-up: offset {}, limit {}",
        config.api.reply_page_offset, config.api.reply_page_limit
    );

    println!("\nScraper:");
    println!(
        "  Request budget: {}",
        max_requests.unwrap_or(config.scraper.max_requests)
    );
    println!(
        "  Pre-request delay: {}ms + up to {}ms jitter",
        config.scraper.delay_min_ms, config.scraper.delay_jitter_ms
    );

    println!("\nOutput:");
    println!(
        "  Artifact: {}/comments-{}.json",
        config.output.directory,
        date.format("%Y-%m-%d")
    );

    println!("\n✓ Configuration is valid");
}
