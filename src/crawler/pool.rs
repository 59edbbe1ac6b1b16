//! Bounded worker pool
//!
//! This module handles:
//! - The job queue: filled with every target, then closed before any worker starts
//! - N workers pulling jobs and pushing one result per job
//! - The supervisor that joins every worker and only then closes the result queue
//!
//! Workers share nothing except the two queues and the fetcher (which holds
//! the shared HTTP client).

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::result::ScrapeResult;
use crate::url::ensure_scheme;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// A single URL to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Position in the submitted list
    pub index: usize,

    /// Target as submitted; the scheme may be missing
    pub url: String,
}

/// Multi-consumer job queue
///
/// All jobs are pushed when the queue is built and the sending side is
/// dropped right away, so the queue is closed before any worker pulls from
/// it. [`JobQueue::pull`] returns `None` once the queue is drained.
pub struct JobQueue {
    receiver: Mutex<mpsc::Receiver<Job>>,
    len: usize,
}

impl JobQueue {
    /// Submits every target and closes the queue
    pub fn submit_all<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        let len = urls.len();
        let (sender, receiver) = mpsc::channel(len.max(1));

        for (index, url) in urls.into_iter().enumerate() {
            if sender.try_send(Job { index, url }).is_err() {
                unreachable!("job queue is sized for every submitted job");
            }
        }
        drop(sender);

        Self {
            receiver: Mutex::new(receiver),
            len,
        }
    }

    /// Pulls the next job, or `None` once the queue is closed and drained
    pub async fn pull(&self) -> Option<Job> {
        self.receiver.lock().await.recv().await
    }

    /// Number of jobs submitted
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no jobs were submitted
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A running pool
///
/// `results` yields exactly one record per submitted job and closes after
/// the supervisor has joined every worker.
pub struct PoolRun {
    /// Result queue; drained by the aggregator
    pub results: mpsc::Receiver<ScrapeResult>,

    /// Supervisor task; resolves to the number of workers that exited cleanly
    pub supervisor: JoinHandle<usize>,

    /// Number of jobs submitted
    pub job_count: usize,
}

/// Pool of fetch workers
#[derive(Clone)]
pub struct WorkerPool {
    fetcher: Arc<dyn PageFetcher>,
    concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool with the given worker count
    ///
    /// A concurrency of zero is treated as one.
    pub fn new(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Configured worker count
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Starts the workers over an already closed job queue
    ///
    /// Never spawns more workers than there are jobs.
    pub fn start(&self, token: CancellationToken, jobs: JobQueue) -> PoolRun {
        let job_count = jobs.len();
        let worker_count = self.concurrency.min(job_count);
        let jobs = Arc::new(jobs);

        // One slot per job: no worker ever waits on a full result queue
        let (result_tx, results) = mpsc::channel(job_count.max(1));

        tracing::debug!(
            "Starting {} workers for {} jobs",
            worker_count,
            job_count
        );

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&jobs),
                Arc::clone(&self.fetcher),
                result_tx.clone(),
                token.clone(),
            ));
        }

        let supervisor = tokio::spawn(supervise(workers, result_tx));

        PoolRun {
            results,
            supervisor,
            job_count,
        }
    }

    /// Runs every target to completion and collects the results
    ///
    /// Results arrive in completion order, not submission order.
    pub async fn run<I, S>(&self, token: CancellationToken, urls: I) -> Vec<ScrapeResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut run = self.start(token, JobQueue::submit_all(urls));
        let mut collected = Vec::with_capacity(run.job_count);

        while let Some(result) = run.results.recv().await {
            collected.push(result);
        }

        if let Err(e) = run.supervisor.await {
            tracing::error!("Pool supervisor failed: {}", e);
        }

        collected
    }
}

/// Worker loop: pull, fetch, push until the job queue is drained
async fn run_worker(
    worker_id: usize,
    jobs: Arc<JobQueue>,
    fetcher: Arc<dyn PageFetcher>,
    results: mpsc::Sender<ScrapeResult>,
    token: CancellationToken,
) -> usize {
    let mut handled = 0;

    while let Some(job) = jobs.pull().await {
        tracing::trace!("Worker {} fetching job {}: {}", worker_id, job.index, job.url);
        let result = fetch_isolated(&fetcher, &token, job).await;
        handled += 1;

        if results.send(result).await.is_err() {
            tracing::warn!("Result queue closed early, worker {} stopping", worker_id);
            break;
        }
    }

    tracing::trace!("Worker {} exiting after {} jobs", worker_id, handled);
    handled
}

/// Runs one fetch in its own task so a panic costs only that job
///
/// A panicked or aborted fetch is reported as a failure with no attempts and
/// the worker keeps pulling.
async fn fetch_isolated(
    fetcher: &Arc<dyn PageFetcher>,
    token: &CancellationToken,
    job: Job,
) -> ScrapeResult {
    let task = {
        let fetcher = Arc::clone(fetcher);
        let token = token.clone();
        let url = job.url.clone();
        tokio::spawn(async move { fetcher.fetch(&token, &url).await })
    };

    match task.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Fetch of job {} ({}) panicked: {}", job.index, job.url, e);
            ScrapeResult::failure(ensure_scheme(&job.url), 0)
        }
    }
}

/// Joins every worker, then closes the result queue
///
/// The supervisor holds its own sender so the queue cannot close before the
/// join completes, even if every worker has already dropped its sender.
async fn supervise(
    mut workers: JoinSet<usize>,
    result_tx: mpsc::Sender<ScrapeResult>,
) -> usize {
    let mut finished = 0;

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(_) => finished += 1,
            Err(e) => tracing::error!("A worker task panicked or was cancelled: {}", e),
        }
    }

    tracing::debug!("All {} workers finished, closing result queue", finished);
    drop(result_tx);
    finished
}
