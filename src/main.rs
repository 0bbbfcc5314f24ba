//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest batch scraper.

use anyhow::Context;
use catalog_harvest::config::load_config_with_hash;
use catalog_harvest::crawler::crawl;
use catalog_harvest::output::print_report;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a batch catalog scraper
///
/// Catalog-Harvest scans a site's paginated catalog for item detail pages,
/// extracts structured metadata and download links from each one, and writes
/// one text file per item.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A batch catalog scraper", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &catalog_harvest::config::Config) {
    use catalog_harvest::crawler::listing_url;

    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing pages: {}", config.site.total_pages);
    println!("  Platform filter: {}", config.site.platform_filter);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Referer: {}", config.http.referer);
    println!("  Request delay: {}ms", config.http.request_delay_ms);
    println!(
        "  Retries: {} (delay {}ms)",
        config.http.max_retries, config.http.retry_delay_ms
    );
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nCrawler:");
    println!("  Workers: {}", config.crawler.workers);

    println!("\nOutput:");
    println!("  Results directory: {}", config.output.results_dir);

    println!("\nListing URLs:");
    println!("  First: {}", listing_url(&config.site.base_url, 1));
    if config.site.total_pages > 1 {
        println!(
            "  Last:  {}",
            listing_url(&config.site.base_url, config.site.total_pages)
        );
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would scan {} listing pages with {} workers",
        config.site.total_pages, config.crawler.workers
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: catalog_harvest::config::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} ({} listing pages)",
        config.site.base_url,
        config.site.total_pages
    );

    match crawl(config).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
