//! Crawler module for catalog fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with pacing and retry logic
//! - Listing page scanning for detail-page links
//! - Detail page extraction into structured records
//! - Two-phase crawl coordination

mod coordinator;
mod detail;
mod fetcher;
mod listing;

pub use coordinator::{run_crawl, Coordinator};
pub use detail::{extract_detail, parse_detail_page, ExtractError};
pub use fetcher::{build_http_client, FetchFailure, FetchedPage, Fetcher};
pub use listing::{extract_item_links, listing_url, scan_listing_page};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the results directory
/// 2. Build the shared HTTP session
/// 3. Scan every listing page for detail URLs
/// 4. Extract and persist every discovered item
/// 5. Return the aggregate report
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(HarvestError)` - Setup failed
pub async fn crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    run_crawl(config).await
}
