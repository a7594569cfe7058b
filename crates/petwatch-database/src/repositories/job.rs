//! Job repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use petwatch_core::error::{AppError, ErrorKind};
use petwatch_core::result::AppResult;
use petwatch_core::types::JobId;
use petwatch_entity::job::{CreateJob, Job, JobStatus};

use crate::store::JobStore;

/// Repository for background job queue operations.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert a job on any executor, skipping it when the dedupe key is taken.
pub(crate) async fn insert_job<'e, E>(
    executor: E,
    data: &CreateJob,
    now: DateTime<Utc>,
) -> Result<Option<Job>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let job = data.clone().into_job(now);
    sqlx::query_as::<_, Job>(
        "INSERT INTO jobs (id, job_type, queue, priority, payload, dedupe_key, status, attempts, \
         max_attempts, scheduled_at, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, 'pending', 0, $7, $8, $9, $9) \
         ON CONFLICT (dedupe_key) DO NOTHING RETURNING *",
    )
    .bind(job.id)
    .bind(&job.job_type)
    .bind(&job.queue)
    .bind(job.priority)
    .bind(&job.payload)
    .bind(&job.dedupe_key)
    .bind(job.max_attempts)
    .bind(job.scheduled_at)
    .bind(now)
    .fetch_optional(executor)
    .await
}

#[async_trait]
impl JobStore for JobRepository {
    async fn enqueue(&self, data: &CreateJob, now: DateTime<Utc>) -> AppResult<Option<Job>> {
        insert_job(&self.pool, data, now)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))
    }

    async fn dequeue(
        &self,
        queue: &str,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'running', started_at = $3, worker_id = $2, \
             attempts = attempts + 1, updated_at = $3 \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE queue = $1 AND status = 'pending' AND scheduled_at <= $3 \
                ORDER BY priority DESC, scheduled_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(queue)
        .bind(worker_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to dequeue job", e))
    }

    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    async fn find_by_status(&self, status: JobStatus, limit: u64) -> AppResult<Vec<Job>> {
        sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at ASC LIMIT $2",
        )
        .bind(status)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list jobs", e))
    }

    async fn complete(&self, id: JobId, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', error_message = NULL, completed_at = $2, \
             updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    async fn reschedule(
        &self,
        id: JobId,
        error_message: &str,
        retry_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'pending', error_message = $2, scheduled_at = $3, \
             worker_id = NULL, updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .bind(retry_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reschedule job", e))?;
        Ok(())
    }

    async fn fail(&self, id: JobId, error_message: &str, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, completed_at = $3, \
             updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark job as failed", e)
        })?;
        Ok(())
    }

    async fn requeue_stale(
        &self,
        started_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE jobs SET status = 'pending', worker_id = NULL, scheduled_at = $2, updated_at = $2 \
             WHERE status = 'running' AND started_at < $1",
        )
        .bind(started_before)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to requeue stale jobs", e))?;
        Ok(result.rows_affected())
    }

    async fn purge_completed(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM jobs WHERE status = 'completed' AND updated_at < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to purge jobs", e))?;
        Ok(result.rows_affected())
    }
}
