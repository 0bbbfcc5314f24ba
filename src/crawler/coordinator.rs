//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the two-phase pipeline:
//! - Phase 1 scans every listing page concurrently and unions the discovered
//!   detail URLs, collapsing duplicates
//! - Phase 2 fetches, extracts, and persists every discovered item
//!   concurrently
//!
//! The phases are strictly sequential: phase 2's task set is derived from
//! phase 1's aggregate output. Within a phase, tasks complete in arbitrary
//! order and no single task failure ever aborts the run.

use crate::config::Config;
use crate::crawler::detail::extract_detail;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::listing::scan_listing_page;
use crate::output::{CrawlReport, RecordSink, TextFileSink};
use crate::HarvestError;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one detail-page task
///
/// Failures are folded into `Skipped` at the task boundary so aggregation
/// stays a plain count over a uniform type.
enum ItemOutcome {
    Written,
    Skipped,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
    sink: Arc<TextFileSink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the shared HTTP session and creates the results directory.
    /// An unwritable results directory is a setup failure and aborts here,
    /// before any request is made.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully initialized
    /// * `Err(HarvestError)` - Client construction or directory creation failed
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let sink = TextFileSink::new(Path::new(&config.output.results_dir))?;
        let client = build_http_client(&config.http)?;
        let fetcher = Fetcher::new(client, &config.http);

        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            sink: Arc::new(sink),
        })
    }

    /// Runs both crawl phases and returns the aggregate report
    pub async fn run(&self) -> Result<CrawlReport, HarvestError> {
        let started_at = Utc::now();
        let start = Instant::now();
        let workers = self.config.crawler.workers as usize;
        let total_pages = self.config.site.total_pages;

        tracing::info!(
            "Starting crawl: {} listing pages, {} workers",
            total_pages,
            workers
        );

        let (discovered, duplicates_collapsed) = self.scan_listings(workers).await;
        let urls_discovered = discovered.len();

        tracing::info!(
            "Discovered {} unique detail URLs across {} pages ({} duplicates collapsed)",
            urls_discovered,
            total_pages,
            duplicates_collapsed
        );

        let (records_written, items_skipped) = self.process_items(discovered, workers).await;

        let report = CrawlReport {
            started_at,
            listing_pages: total_pages,
            urls_discovered,
            duplicates_collapsed,
            records_written,
            items_skipped,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Completed processing {} items in {:.2}s",
            report.records_written,
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }

    /// Phase 1: scans every listing page and unions the results
    ///
    /// Pages are scanned through a bounded worker pool; per-page counts are
    /// logged as the pages complete, not in submission order. The union
    /// preserves first-discovery order and collapses URLs that appear on
    /// more than one listing page, so phase 2 fetches each item once.
    async fn scan_listings(&self, workers: usize) -> (Vec<String>, usize) {
        let mut page_results = stream::iter(1..=self.config.site.total_pages)
            .map(|page_index| {
                let fetcher = Arc::clone(&self.fetcher);
                let config = Arc::clone(&self.config);
                async move {
                    let links = scan_listing_page(&fetcher, &config.site, page_index).await;
                    (page_index, links)
                }
            })
            .buffer_unordered(workers);

        let mut discovered = Vec::new();
        let mut seen = HashSet::new();
        let mut duplicates_collapsed = 0;

        while let Some((page_index, links)) = page_results.next().await {
            tracing::info!("Page {} processed - found {} items", page_index, links.len());
            for link in links {
                if seen.insert(link.clone()) {
                    discovered.push(link);
                } else {
                    duplicates_collapsed += 1;
                }
            }
        }

        (discovered, duplicates_collapsed)
    }

    /// Phase 2: extracts and persists every discovered item
    ///
    /// Returns `(records_written, items_skipped)`.
    async fn process_items(&self, urls: Vec<String>, workers: usize) -> (usize, usize) {
        let mut outcomes = stream::iter(urls)
            .map(|url| {
                let fetcher = Arc::clone(&self.fetcher);
                let sink = Arc::clone(&self.sink);
                async move { process_item(&fetcher, sink.as_ref(), &url).await }
            })
            .buffer_unordered(workers);

        let mut records_written = 0;
        let mut items_skipped = 0;

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                ItemOutcome::Written => records_written += 1,
                ItemOutcome::Skipped => items_skipped += 1,
            }
        }

        (records_written, items_skipped)
    }
}

/// Fetches, extracts, and persists one item
///
/// Every failure is caught here, logged with the offending URL, and reported
/// as a skip; nothing propagates into the phase.
async fn process_item(fetcher: &Fetcher, sink: &dyn RecordSink, url: &str) -> ItemOutcome {
    let record = match extract_detail(fetcher, url).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Skipping {}: {}", url, e);
            return ItemOutcome::Skipped;
        }
    };

    match sink.write(&record) {
        Ok(()) => ItemOutcome::Written,
        Err(e) => {
            tracing::error!("Failed to write record for {}: {}", url, e);
            ItemOutcome::Skipped
        }
    }
}

/// Runs the main crawl operation
///
/// This function initializes the shared session and results directory, runs
/// both phases, and returns the aggregate report.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (individual items may have been skipped)
/// * `Err(HarvestError)` - Setup failed before the crawl could start
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::load_config;
/// use catalog_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("wrote {} records", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
