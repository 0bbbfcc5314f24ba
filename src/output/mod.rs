//! Output module for record persistence and run reporting
//!
//! This module handles:
//! - Writing one text file per extracted record
//! - Sanitizing item names into file names
//! - Printing the end-of-run report

mod filename;
mod report;
mod writer;

pub use filename::sanitize_filename;
pub use report::{print_report, CrawlReport};
pub use writer::{OutputResult, RecordSink, TextFileSink};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
