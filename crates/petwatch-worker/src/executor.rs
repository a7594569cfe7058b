//! Job executor that dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use petwatch_core::error::AppError;
use petwatch_entity::job::{Job, JobPayload};

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the job with the given payload
    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Error raised by a service or store
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Whether another attempt could succeed. Store and gateway faults are
    /// retried; client-class errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Permanent(_) => false,
            Self::Transient(_) => true,
            Self::Internal(err) => !err.is_client_error(),
        }
    }
}

/// Decode the typed payload stored with a job.
pub fn decode_payload(job: &Job) -> Result<JobPayload, JobExecutionError> {
    serde_json::from_value(job.payload.clone()).map_err(|e| {
        JobExecutionError::Permanent(format!("Malformed payload for job {}: {e}", job.id))
    })
}

/// Dispatches jobs to the appropriate handler based on job_type
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;

        tracing::debug!(
            job_id = %job.id,
            job_type = %job.job_type,
            attempt = job.attempts,
            max_attempts = job.max_attempts,
            "Executing job"
        );

        handler.execute(job).await
    }

    /// Check if a handler is registered for a job type
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use petwatch_entity::job::CreateJob;

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl JobHandler for Echo {
        fn job_type(&self) -> &str {
            "job_cleanup"
        }

        async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
            Ok(Some(serde_json::json!({"ok": true})))
        }
    }

    fn job(payload: &JobPayload) -> Job {
        CreateJob::from_payload(payload, 3)
            .expect("payload")
            .into_job(Utc::now())
    }

    #[tokio::test]
    async fn test_dispatches_by_job_type() {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(Echo));
        assert!(executor.has_handler("job_cleanup"));

        let out = executor.execute(&job(&JobPayload::JobCleanup)).await.expect("run");
        assert_eq!(out, Some(serde_json::json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_unknown_job_type_is_permanent() {
        let executor = JobExecutor::new();
        let err = executor
            .execute(&job(&JobPayload::JobCleanup))
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retry_classification() {
        assert!(JobExecutionError::Transient("503".into()).is_retryable());
        assert!(JobExecutionError::from(AppError::database("down")).is_retryable());
        assert!(!JobExecutionError::from(AppError::not_found("gone")).is_retryable());
    }

    #[test]
    fn test_malformed_payload_is_permanent() {
        let mut j = job(&JobPayload::JobCleanup);
        j.payload = serde_json::json!({"job_type": "nope"});
        assert!(matches!(decode_payload(&j), Err(JobExecutionError::Permanent(_))));
    }
}
