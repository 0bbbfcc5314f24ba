//! Record persistence
//!
//! This module defines the sink interface records are handed to after
//! extraction, and the plain-text file implementation used in production.

use crate::output::filename::sanitize_filename;
use crate::output::OutputError;
use crate::record::ItemRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record sinks
///
/// A sink receives each fully extracted record exactly once. Implementations
/// must be safe to share across worker tasks.
pub trait RecordSink: Send + Sync {
    /// Persists a single record
    fn write(&self, record: &ItemRecord) -> OutputResult<()>;
}

/// Writes each record as one UTF-8 text file in a results directory
///
/// File names derive from the sanitized item name with a `.txt` extension.
/// Two different source URLs whose names sanitize identically overwrite each
/// other, last writer wins; this is a known limitation of name-keyed output.
pub struct TextFileSink {
    results_dir: PathBuf,
}

impl TextFileSink {
    /// Creates the sink, creating the results directory if absent
    ///
    /// # Arguments
    ///
    /// * `results_dir` - Directory that receives one file per record
    ///
    /// # Returns
    ///
    /// * `Ok(TextFileSink)` - Directory exists and is usable
    /// * `Err(OutputError)` - Directory could not be created
    pub fn new(results_dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(results_dir)?;
        Ok(Self {
            results_dir: results_dir.to_path_buf(),
        })
    }

    /// The path a record would be written to
    pub fn path_for(&self, record: &ItemRecord) -> PathBuf {
        self.results_dir
            .join(format!("{}.txt", sanitize_filename(&record.name)))
    }
}

impl RecordSink for TextFileSink {
    fn write(&self, record: &ItemRecord) -> OutputResult<()> {
        let path = self.path_for(record);
        fs::write(&path, record.render())?;
        tracing::debug!("Wrote record to {}", path.display());
        Ok(())
    }
}
