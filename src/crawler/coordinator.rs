//! Pipeline driver - wires the queues, the pool and the aggregator together
//!
//! Shutdown order:
//! 1. Submit every target and close the job queue
//! 2. Start the workers
//! 3. The pool supervisor joins the workers, then closes the result queue
//! 4. Drain the result queue into the aggregator until it closes
//! 5. Finalize the report

use crate::config::{validate, Config, ScraperConfig};
use crate::crawler::aggregator::{AggregateReport, Aggregator};
use crate::crawler::fetcher::{Fetcher, PageFetcher};
use crate::crawler::pool::{JobQueue, WorkerPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Main pipeline coordinator
pub struct Coordinator {
    pool: WorkerPool,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP fetcher built from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(PulseError)` - The HTTP client could not be built
    pub fn new(config: &ScraperConfig) -> crate::Result<Self> {
        let fetcher = Fetcher::from_config(config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config.concurrency))
    }

    /// Creates a coordinator around any fetch capability
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> Self {
        Self {
            pool: WorkerPool::new(fetcher, concurrency),
        }
    }

    /// Runs every target through the pool and aggregates the results
    ///
    /// Completes once every job has produced its result. Cancelling `token`
    /// turns every unfinished job into a failure; the run still drains.
    pub async fn run<I, S>(&self, urls: I, token: CancellationToken) -> AggregateReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let jobs = JobQueue::submit_all(urls);
        let total_jobs = jobs.len();
        tracing::info!(
            "Submitted {} jobs to a pool of {} workers",
            total_jobs,
            self.pool.concurrency()
        );

        let start_time = std::time::Instant::now();
        let mut aggregator = Aggregator::new();
        let mut run = self.pool.start(token, jobs);

        while let Some(result) = run.results.recv().await {
            aggregator.process(result);
        }

        match run.supervisor.await {
            Ok(workers) => tracing::debug!("{} workers exited cleanly", workers),
            Err(e) => tracing::error!("Pool supervisor failed: {}", e),
        }

        let report = aggregator.finish();
        if report.processed_count() != total_jobs {
            tracing::warn!(
                "Received {} results for {} jobs",
                report.processed_count(),
                total_jobs
            );
        }

        tracing::info!(
            "Pipeline finished: {} succeeded, {} failed, {} submitted ({:.1}% success) in {:?}",
            report.total_count,
            report.failure_count,
            total_jobs,
            report.success_rate(),
            start_time.elapsed()
        );

        report
    }
}

/// Runs a complete pipeline over the configured targets
///
/// This is the main entry point. It builds the HTTP client, arms the optional
/// pipeline deadline, and drives every target to a result.
///
/// # Arguments
///
/// * `config` - The configuration; checked with [`validate`] before anything runs
/// * `token` - External cancellation (e.g. Ctrl-C); the deadline cancels a child of it
///
/// # Returns
///
/// * `Ok(AggregateReport)` - Pipeline completed
/// * `Err(PulseError)` - The configuration is invalid or the HTTP client could not be built
pub async fn run_pipeline(
    config: &Config,
    token: CancellationToken,
) -> crate::Result<AggregateReport> {
    validate(config)?;
    let coordinator = Coordinator::new(&config.scraper)?;
    let token = token.child_token();

    let deadline = config
        .scraper
        .deadline()
        .map(|limit| spawn_deadline(limit, token.clone()));

    let report = coordinator
        .run(config.targets.urls.iter().cloned(), token)
        .await;

    if let Some(deadline) = deadline {
        deadline.abort();
    }

    Ok(report)
}

/// Cancels `token` once `limit` has elapsed
fn spawn_deadline(limit: Duration, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(limit) => {
                tracing::warn!("Deadline of {:?} reached, cancelling remaining work", limit);
                token.cancel();
            }
        }
    })
}
