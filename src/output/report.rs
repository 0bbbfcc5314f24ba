//! Run report
//!
//! Aggregate counts and timing for one crawl run, printed to the console
//! after both phases complete.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Aggregate outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Wall-clock time the run started
    pub started_at: DateTime<Utc>,

    /// Listing pages scanned in phase 1
    pub listing_pages: u32,

    /// Unique detail URLs discovered across all listing pages
    pub urls_discovered: usize,

    /// Detail URLs that appeared on more than one listing page and were
    /// collapsed before phase 2
    pub duplicates_collapsed: usize,

    /// Records successfully extracted and written in phase 2
    pub records_written: usize,

    /// Items skipped after a terminal fetch, parse, or write failure
    pub items_skipped: usize,

    /// Total wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns the share of discovered items that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.urls_discovered == 0 {
            return 0.0;
        }
        (self.records_written as f64 / self.urls_discovered as f64) * 100.0
    }
}

/// Prints a report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Started at: {}", report.started_at.to_rfc3339());
    println!("Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    println!();

    println!("Discovery:");
    println!("  Listing pages scanned: {}", report.listing_pages);
    println!("  Detail URLs discovered: {}", report.urls_discovered);
    if report.duplicates_collapsed > 0 {
        println!(
            "  Duplicate URLs collapsed: {}",
            report.duplicates_collapsed
        );
    }
    println!();

    println!("Results:");
    println!("  Records written: {}", report.records_written);
    println!("  Items skipped: {}", report.items_skipped);
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} items)",
        report.success_rate(),
        report.records_written,
        report.urls_discovered
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CrawlReport {
        CrawlReport {
            started_at: Utc::now(),
            listing_pages: 2,
            urls_discovered: 10,
            duplicates_collapsed: 1,
            records_written: 8,
            items_skipped: 2,
            elapsed: Duration::from_secs(42),
        }
    }

    #[test]
    fn test_success_rate() {
        let report = sample_report();
        assert!((report.success_rate() - 80.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_no_urls() {
        let mut report = sample_report();
        report.urls_discovered = 0;
        report.records_written = 0;
        assert_eq!(report.success_rate(), 0.0);
    }
}
