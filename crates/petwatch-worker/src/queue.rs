//! Job queue over the durable outbox table.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing;

use petwatch_core::config::WorkerConfig;
use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::JobId;
use petwatch_database::store::JobStore;
use petwatch_entity::job::{CreateJob, Job, JobPayload};

/// Queue every job type is enqueued on.
pub const DEFAULT_QUEUE: &str = "default";

/// Job queue for enqueuing, claiming, and settling work
#[derive(Clone)]
pub struct JobQueue {
    /// Job persistence
    store: Arc<dyn JobStore>,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Worker identifier for claiming jobs
    worker_id: String,
    /// Attempt limits and backoff
    config: WorkerConfig,
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("worker_id", &self.worker_id)
            .finish_non_exhaustive()
    }
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(
        store: Arc<dyn JobStore>,
        clock: Arc<dyn Clock>,
        worker_id: String,
        config: WorkerConfig,
    ) -> Self {
        Self {
            store,
            clock,
            worker_id,
            config,
        }
    }

    /// This worker's identifier
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Enqueue a typed job. Returns `None` when an identical job is already
    /// queued.
    pub async fn enqueue(&self, payload: &JobPayload) -> Result<Option<Job>, AppError> {
        let data = CreateJob::from_payload(payload, self.config.max_attempts)?;
        let job = self.store.enqueue(&data, self.clock.now()).await?;

        match &job {
            Some(job) => tracing::debug!(
                job_id = %job.id,
                job_type = %job.job_type,
                queue = %job.queue,
                "Enqueued job"
            ),
            None => tracing::debug!(job_type = payload.job_type(), "Job already queued"),
        }
        Ok(job)
    }

    /// Claim the next due job from the given queues, in order
    pub async fn dequeue(&self, queues: &[&str]) -> Result<Option<Job>, AppError> {
        let now = self.clock.now();
        for queue in queues {
            if let Some(job) = self.store.dequeue(queue, &self.worker_id, now).await? {
                tracing::debug!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    queue = %job.queue,
                    "Dequeued job"
                );
                return Ok(Some(job));
            }
        }
        Ok(None)
    }

    /// Mark a job as completed successfully
    pub async fn complete(&self, job_id: JobId) -> Result<(), AppError> {
        self.store.complete(job_id, self.clock.now()).await?;
        tracing::debug!(job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Put a failed attempt back on the queue after its backoff. Returns
    /// when it becomes due again.
    pub async fn retry_later(&self, job: &Job, error: &str) -> Result<DateTime<Utc>, AppError> {
        let now = self.clock.now();
        let delay = self.config.retry_delay_seconds(job.attempts);
        let retry_at = now + Duration::seconds(delay as i64);
        self.store.reschedule(job.id, error, retry_at, now).await?;
        tracing::debug!(job_id = %job.id, retry_in_seconds = delay, "Job rescheduled");
        Ok(retry_at)
    }

    /// Mark a job as failed. Failed jobs stay in the table as the
    /// dead-letter record.
    pub async fn fail(&self, job_id: JobId, error: &str) -> Result<(), AppError> {
        self.store.fail(job_id, error, self.clock.now()).await?;
        tracing::debug!(job_id = %job_id, error = %error, "Job failed");
        Ok(())
    }
}
