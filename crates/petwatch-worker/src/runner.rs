//! Worker runner: main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing;

use petwatch_core::config::WorkerConfig;
use petwatch_core::error::AppError;
use petwatch_entity::job::Job;

use crate::executor::JobExecutor;
use crate::queue::{DEFAULT_QUEUE, JobQueue};

/// How long shutdown waits for in-flight jobs.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Main worker runner that polls queues and executes jobs
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
    /// Queues to poll (in priority order)
    queues: Vec<String>,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
            queues: vec![DEFAULT_QUEUE.to_string()],
        }
    }

    /// Start the worker runner; runs until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let worker_id = self.queue.worker_id();
        tracing::info!(
            worker_id = %worker_id,
            concurrency = self.config.concurrency,
            poll_interval_seconds = self.config.poll_interval_seconds,
            queues = ?self.queues,
            "Worker started"
        );

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds.max(1));

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!(worker_id = %worker_id, "Worker received shutdown signal");
                        break;
                    }
                }
                claimed = self.poll_and_execute(&semaphore) => {
                    // Keep draining while there is work; sleep only when idle.
                    if claimed {
                        continue;
                    }
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                tracing::info!(worker_id = %worker_id, "Worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!(worker_id = %worker_id, "Waiting for in-flight jobs to complete");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if time::timeout(DRAIN_TIMEOUT, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(worker_id = %worker_id, "In-flight jobs still running at shutdown");
        }

        tracing::info!(worker_id = %worker_id, "Worker shut down complete");
    }

    /// Run every job that is currently due, one at a time, and return how
    /// many were processed. Jobs rescheduled for later are not waited for.
    pub async fn run_pending(&self) -> Result<usize, AppError> {
        let queue_refs: Vec<&str> = self.queues.iter().map(String::as_str).collect();
        let mut processed = 0;
        while let Some(job) = self.queue.dequeue(&queue_refs).await? {
            settle(&self.queue, &self.executor, job).await;
            processed += 1;
        }
        Ok(processed)
    }

    /// Poll for a job and spawn it if available. Returns whether a job was
    /// claimed.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => return false,
        };

        let queue_refs: Vec<&str> = self.queues.iter().map(String::as_str).collect();

        match self.queue.dequeue(&queue_refs).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);
                tokio::spawn(async move {
                    let _permit = permit;
                    settle(&queue, &executor, job).await;
                });
                true
            }
            Ok(None) => {
                tracing::trace!("No jobs available in queues");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }
}

/// Execute one claimed job and record its outcome.
async fn settle(queue: &JobQueue, executor: &JobExecutor, job: Job) {
    let job_id = job.id;

    match executor.execute(&job).await {
        Ok(result) => {
            if let Err(e) = queue.complete(job_id).await {
                tracing::error!(job_id = %job_id, error = %e, "Failed to mark job as completed");
                return;
            }
            tracing::info!(
                job_id = %job_id,
                job_type = %job.job_type,
                result = ?result,
                "Job completed"
            );
        }
        Err(err) if err.is_retryable() && job.can_retry() => {
            let msg = err.to_string();
            match queue.retry_later(&job, &msg).await {
                Ok(retry_at) => tracing::warn!(
                    job_id = %job_id,
                    job_type = %job.job_type,
                    attempt = job.attempts,
                    max_attempts = job.max_attempts,
                    retry_at = %retry_at,
                    error = %msg,
                    "Job failed, will retry"
                ),
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to reschedule job")
                }
            }
        }
        Err(err) => {
            let msg = err.to_string();
            tracing::error!(
                job_id = %job_id,
                job_type = %job.job_type,
                attempt = job.attempts,
                error = %msg,
                "Job failed permanently"
            );
            if let Err(e) = queue.fail(job_id, &msg).await {
                tracing::error!(job_id = %job_id, error = %e, "Failed to mark job as failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use petwatch_core::traits::{Clock, ManualClock};
    use petwatch_database::MemoryStore;
    use petwatch_database::store::JobStore;
    use petwatch_entity::job::{JobPayload, JobStatus};
    use serde_json::Value;

    use super::*;
    use crate::executor::{JobExecutionError, JobHandler};

    /// Fails transiently `failures` times, then succeeds.
    #[derive(Debug)]
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
        permanent: bool,
    }

    #[async_trait]
    impl JobHandler for Flaky {
        fn job_type(&self) -> &str {
            "job_cleanup"
        }

        async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.permanent {
                return Err(JobExecutionError::Permanent("bad input".into()));
            }
            if n < self.failures {
                Err(JobExecutionError::Transient("gateway timeout".into()))
            } else {
                Ok(None)
            }
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        queue: Arc<JobQueue>,
        runner: WorkerRunner,
        handler: Arc<Flaky>,
    }

    fn fixture(failures: usize, permanent: bool) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = WorkerConfig {
            max_attempts: 3,
            ..Default::default()
        };
        let queue = Arc::new(JobQueue::new(
            store.clone(),
            clock.clone(),
            "worker-test".to_string(),
            config.clone(),
        ));
        let handler = Arc::new(Flaky {
            failures,
            calls: AtomicUsize::new(0),
            permanent,
        });
        let mut executor = JobExecutor::new();
        executor.register(handler.clone());
        let runner = WorkerRunner::new(queue.clone(), Arc::new(executor), config);
        Fixture {
            store,
            clock,
            queue,
            runner,
            handler,
        }
    }

    #[tokio::test]
    async fn test_transient_failure_backs_off_then_succeeds() {
        let f = fixture(1, false);
        let job = f.queue.enqueue(&JobPayload::JobCleanup).await.expect("enqueue").expect("new");

        assert_eq!(f.runner.run_pending().await.expect("run"), 1);
        let after_first = f.store.find_by_id(job.id).await.expect("find").expect("job");
        assert_eq!(after_first.status, JobStatus::Pending);
        assert_eq!(after_first.attempts, 1);
        assert_eq!(after_first.scheduled_at, f.clock.now() + ChronoDuration::seconds(10));

        // Not due yet.
        assert_eq!(f.runner.run_pending().await.expect("run"), 0);

        f.clock.advance(ChronoDuration::seconds(10));
        assert_eq!(f.runner.run_pending().await.expect("run"), 1);
        let done = f.store.find_by_id(job.id).await.expect("find").expect("job");
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(f.handler.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_end_in_failed() {
        let f = fixture(usize::MAX, false);
        let job = f.queue.enqueue(&JobPayload::JobCleanup).await.expect("enqueue").expect("new");

        for _ in 0..3 {
            f.runner.run_pending().await.expect("run");
            f.clock.advance(ChronoDuration::seconds(900));
        }
        let dead = f.store.find_by_id(job.id).await.expect("find").expect("job");
        assert_eq!(dead.status, JobStatus::Failed);
        assert!(dead.status.is_terminal());
        assert_eq!(dead.attempts, 3);
        assert!(dead.error_message.unwrap_or_default().contains("gateway timeout"));

        f.clock.advance(ChronoDuration::hours(1));
        assert_eq!(f.runner.run_pending().await.expect("run"), 0);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let f = fixture(0, true);
        let job = f.queue.enqueue(&JobPayload::JobCleanup).await.expect("enqueue").expect("new");
        f.runner.run_pending().await.expect("run");

        let dead = f.store.find_by_id(job.id).await.expect("find").expect("job");
        assert_eq!(dead.status, JobStatus::Failed);
        assert_eq!(dead.attempts, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let f = fixture(0, false);
        f.queue.enqueue(&JobPayload::JobCleanup).await.expect("enqueue");
        let runner = Arc::new(f.runner);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run(rx).await }
        });
        tx.send(true).expect("signal");
        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("runner exits")
            .expect("no panic");
    }
}
