//! Single-writer aggregation of fetch results
//!
//! The aggregator is owned by the task draining the result queue. It is the
//! only code that mutates the report, so the report needs no lock.

use crate::crawler::result::{ScrapeResult, SiteInfo};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cumulative report of a pipeline run
///
/// Serializes to `{"results": {...}, "total_count": n}`. Keys are sorted so
/// the written report is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    /// One entry per successfully fetched URL
    pub results: BTreeMap<String, SiteInfo>,

    /// Number of successful URLs; always `results.len()`
    pub total_count: usize,

    /// Number of failed results received
    #[serde(skip)]
    pub failure_count: usize,
}

impl AggregateReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Total results received, successful or not
    pub fn processed_count(&self) -> usize {
        self.total_count + self.failure_count
    }

    /// Success rate as a percentage of all processed results
    pub fn success_rate(&self) -> f64 {
        let processed = self.processed_count();
        if processed == 0 {
            return 0.0;
        }
        (self.total_count as f64 / processed as f64) * 100.0
    }
}

/// Consumes results one at a time into an [`AggregateReport`]
#[derive(Debug, Default)]
pub struct Aggregator {
    report: AggregateReport,
}

impl Aggregator {
    /// Creates an aggregator with an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one result into the report
    ///
    /// Successful results insert or overwrite the entry for their URL;
    /// failures are only counted and logged.
    pub fn process(&mut self, result: ScrapeResult) {
        if result.is_active {
            tracing::info!("Processed result for [{}] | H1: {}", result.url, result.h1);
            let info = result.site_info();
            if self.report.results.insert(result.url, info).is_some() {
                tracing::debug!("Duplicate success overwrote an existing entry");
            }
            self.report.total_count = self.report.results.len();
        } else {
            tracing::warn!(
                "Failure: {} was unreachable after {} attempts",
                result.url,
                result.attempts
            );
            self.report.failure_count += 1;
        }
    }

    /// The report accumulated so far
    pub fn report(&self) -> &AggregateReport {
        &self.report
    }

    /// Finalizes the run and hands over the report
    pub fn finish(self) -> AggregateReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::result::ExtractedPage;

    fn success(url: &str, h1: &str) -> ScrapeResult {
        ScrapeResult::success(
            url,
            200,
            1,
            ExtractedPage {
                title: format!("{} title", h1),
                h1: h1.to_string(),
                all_headers: vec![h1.to_string()],
                description: String::new(),
            },
        )
    }

    #[test]
    fn test_success_is_recorded() {
        let mut aggregator = Aggregator::new();
        aggregator.process(success("https://example.com", "H"));

        let report = aggregator.finish();
        assert_eq!(report.total_count, 1);
        assert_eq!(report.failure_count, 0);
        assert_eq!(report.results["https://example.com"].h1, "H");
    }

    #[test]
    fn test_failure_leaves_results_untouched() {
        let mut aggregator = Aggregator::new();
        aggregator.process(ScrapeResult::failure("https://badhost.invalid", 3));

        let report = aggregator.report();
        assert_eq!(report.total_count, 0);
        assert_eq!(report.failure_count, 1);
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_duplicate_success_overwrites() {
        let mut aggregator = Aggregator::new();
        aggregator.process(success("https://example.com", "Old"));
        aggregator.process(success("https://example.com", "New"));

        let report = aggregator.finish();
        assert_eq!(report.total_count, 1);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results["https://example.com"].h1, "New");
    }

    #[test]
    fn test_total_count_tracks_results_len() {
        let mut aggregator = Aggregator::new();
        for (i, active) in [true, false, true, true, false].iter().enumerate() {
            let url = format!("https://site-{}.example", i);
            if *active {
                aggregator.process(success(&url, "x"));
            } else {
                aggregator.process(ScrapeResult::failure(url, 3));
            }
            let report = aggregator.report();
            assert_eq!(report.total_count, report.results.len());
        }

        let report = aggregator.finish();
        assert_eq!(report.total_count, 3);
        assert_eq!(report.failure_count, 2);
        assert_eq!(report.processed_count(), 5);
        assert!((report.success_rate() - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let mut forward = Aggregator::new();
        let mut backward = Aggregator::new();
        let results: Vec<_> = (0..5)
            .map(|i| success(&format!("https://{}.example", i), "h"))
            .collect();

        for result in results.iter().cloned() {
            forward.process(result);
        }
        for result in results.into_iter().rev() {
            backward.process(result);
        }

        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_success_rate_empty() {
        assert_eq!(AggregateReport::new().success_rate(), 0.0);
    }

    #[test]
    fn test_serialized_shape() {
        let mut aggregator = Aggregator::new();
        aggregator.process(success("https://example.com", "H"));
        aggregator.process(ScrapeResult::failure("https://down.example", 3));

        let json = serde_json::to_value(aggregator.finish()).unwrap();
        assert_eq!(json["total_count"], 1);
        assert_eq!(json["results"]["https://example.com"]["h1"], "H");
        assert!(json.get("failure_count").is_none());
    }
}
