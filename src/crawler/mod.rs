//! Crawler module: the concurrent fetch pipeline
//!
//! This module contains:
//! - Document extraction (title, headings, meta description)
//! - HTTP fetching with bounded retry and exponential backoff
//! - The worker pool and its job/result queues
//! - Single-writer aggregation of results
//! - The pipeline driver that sequences shutdown

mod aggregator;
mod backoff;
mod coordinator;
mod fetcher;
mod parser;
mod pool;
mod result;

pub use aggregator::{AggregateReport, Aggregator};
pub use backoff::{RetryPolicy, Sleeper, TokioSleeper};
pub use coordinator::{run_pipeline, Coordinator};
pub use fetcher::{build_http_client, Fetcher, PageFetcher};
pub use parser::{parse_html, DocumentExtractor, HtmlExtractor};
pub use pool::{Job, JobQueue, PoolRun, WorkerPool};
pub use result::{ExtractedPage, ScrapeResult, SiteInfo};
