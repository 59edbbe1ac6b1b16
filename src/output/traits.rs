//! Output handler traits and errors
//!
//! Output handlers turn a finished [`AggregateReport`] into an artifact on disk.

use crate::crawler::AggregateReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
pub trait OutputHandler {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Where the artifact is written
    fn path(&self) -> &Path;

    /// Renders the report into the artifact's contents
    fn render(&self, report: &AggregateReport) -> OutputResult<String>;

    /// Renders and writes the report, creating parent directories as needed
    fn write(&self, report: &AggregateReport) -> OutputResult<()> {
        let contents = self.render(report)?;
        write_file(self.path(), contents.as_bytes())
    }
}

/// Writes `contents` to `path`, creating missing parent directories
pub(crate) fn write_file(path: &Path, contents: &[u8]) -> OutputResult<()> {
    let wrap = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }

    std::fs::write(path, contents).map_err(wrap)
}
