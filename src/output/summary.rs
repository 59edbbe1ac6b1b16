//! Plain-text summary generation
//!
//! The summary lists every successful URL with its main heading:
//!
//! ```text
//! Scraper Summary Report
//! Time: Mon, 19 Oct 2026 10:00:00 GMT
//! Total Successful Scrapes: 1
//!
//! Detailed Results:
//! - https://example.com: Example Domain
//! ```

use crate::crawler::AggregateReport;
use crate::output::traits::{OutputHandler, OutputResult};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// RFC 1123 timestamp layout
const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Writes the human-readable summary
#[derive(Debug, Clone)]
pub struct SummaryWriter {
    path: PathBuf,
}

impl SummaryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for SummaryWriter {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, report: &AggregateReport) -> OutputResult<String> {
        Ok(format_summary(report, Utc::now()))
    }
}

/// Formats a report as the plain-text summary
///
/// # Arguments
///
/// * `report` - The finished report
/// * `generated_at` - Timestamp printed in the header
pub fn format_summary(report: &AggregateReport, generated_at: DateTime<Utc>) -> String {
    let mut text = String::new();

    text.push_str("Scraper Summary Report\n");
    text.push_str(&format!(
        "Time: {}\n",
        generated_at.format(TIMESTAMP_FORMAT)
    ));
    text.push_str(&format!(
        "Total Successful Scrapes: {}\n",
        report.total_count
    ));
    text.push_str("\nDetailed Results:\n");

    for (url, info) in &report.results {
        text.push_str(&format!("- {}: {}\n", url, info.h1));
    }

    text
}
