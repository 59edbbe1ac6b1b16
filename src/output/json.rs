//! JSON report generation

use crate::crawler::AggregateReport;
use crate::output::traits::{OutputHandler, OutputResult};
use std::path::{Path, PathBuf};

/// Writes the report as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for JsonReportWriter {
    fn name(&self) -> &'static str {
        "json report"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, report: &AggregateReport) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
