//! Output module for writing run reports
//!
//! This module handles:
//! - The JSON report keyed by URL
//! - The plain-text summary

mod json;
mod summary;
mod traits;

pub use json::JsonReportWriter;
pub use summary::{format_summary, SummaryWriter};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;
use crate::crawler::AggregateReport;

/// Writes every configured artifact for a finished report
///
/// # Arguments
///
/// * `report` - The finished report
/// * `config` - Output locations
///
/// # Returns
///
/// * `Ok(())` - Every artifact was written
/// * `Err(OutputError)` - The first artifact that failed
pub fn write_reports(report: &AggregateReport, config: &OutputConfig) -> OutputResult<()> {
    let handlers: [Box<dyn OutputHandler>; 2] = [
        Box::new(JsonReportWriter::new(&config.results_path)),
        Box::new(SummaryWriter::new(&config.summary_path)),
    ];

    for handler in &handlers {
        handler.write(report)?;
        tracing::debug!("Wrote {} to {}", handler.name(), handler.path().display());
    }

    tracing::info!(
        "Results saved to {} and {}",
        config.results_path.display(),
        config.summary_path.display()
    );

    Ok(())
}
