//! Job entity model.

use chrono::{DateTime, Utc};
use petwatch_core::types::JobId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::payload::JobPayload;
use super::status::{JobPriority, JobStatus};

/// A background job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Job type identifier (e.g., `"sighting_match"`, `"push_delivery"`).
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job priority.
    pub priority: JobPriority,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Key that makes enqueueing idempotent.
    pub dedupe_key: Option<String>,
    /// Last error message.
    pub error_message: Option<String>,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts so far.
    pub attempts: i32,
    /// Attempts allowed before the job is left failed.
    pub max_attempts: i32,
    /// Earliest time a worker may claim the job.
    pub scheduled_at: DateTime<Utc>,
    /// When the current or last attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Worker ID that picked up the job.
    pub worker_id: Option<String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether another attempt is allowed after the current one fails.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Job type identifier.
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Priority.
    pub priority: JobPriority,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Idempotency key; a second job with the same key is not created.
    pub dedupe_key: Option<String>,
    /// Maximum attempts.
    pub max_attempts: i32,
    /// Earliest execution time (None = immediate).
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CreateJob {
    /// Build a job from a typed payload with default queue and priority.
    pub fn from_payload(payload: &JobPayload, max_attempts: i32) -> Result<Self, serde_json::Error> {
        Ok(Self {
            job_type: payload.job_type().to_string(),
            queue: "default".to_string(),
            priority: payload.default_priority(),
            payload: serde_json::to_value(payload)?,
            dedupe_key: payload.dedupe_key(),
            max_attempts,
            scheduled_at: None,
        })
    }

    /// Materialize a pending row created at `now`.
    pub fn into_job(self, now: DateTime<Utc>) -> Job {
        Job {
            id: JobId::new(),
            job_type: self.job_type,
            queue: self.queue,
            priority: self.priority,
            payload: self.payload,
            dedupe_key: self.dedupe_key,
            error_message: None,
            status: JobStatus::Pending,
            attempts: 0,
            max_attempts: self.max_attempts,
            scheduled_at: self.scheduled_at.unwrap_or(now),
            started_at: None,
            completed_at: None,
            worker_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
