//! Job table maintenance: stale claim recovery and completed-job purge.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use tracing;

use petwatch_core::config::WorkerConfig;
use petwatch_core::traits::Clock;
use petwatch_database::store::JobStore;
use petwatch_entity::job::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Requeues jobs abandoned by a crashed worker and purges old completed
/// jobs. Failed jobs are kept.
pub struct JobCleanupHandler {
    /// Job persistence
    jobs: Arc<dyn JobStore>,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Age after which a running job counts as abandoned
    stale_after: Duration,
    /// How long completed jobs are kept
    retention: Duration,
}

impl std::fmt::Debug for JobCleanupHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobCleanupHandler")
            .field("stale_after", &self.stale_after)
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}

impl JobCleanupHandler {
    /// Create a new cleanup handler
    pub fn new(jobs: Arc<dyn JobStore>, clock: Arc<dyn Clock>, config: &WorkerConfig) -> Self {
                Self {
            jobs,
            clock,
            stale_after: Duration::seconds(config.stale_after_seconds() as i64),
            retention: Duration::days(config.completed_job_retention_days.clamp(0, 3650)),
        }
    }
}

#[async_trait]
impl JobHandler for JobCleanupHandler {
    fn job_type(&self) -> &str {
        "job_cleanup"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let now = self.clock.now();

        let requeued = self.jobs.requeue_stale(now - self.stale_after, now).await?;
        if requeued > 0 {
            tracing::warn!(requeued, "Requeued jobs abandoned by a previous worker");
        }

        let purged = self.jobs.purge_completed(now - self.retention).await?;
        tracing::info!(requeued, purged, "Job cleanup finished");

        Ok(Some(serde_json::json!({
            "task": "job_cleanup",
            "stale_requeued": requeued,
            "completed_purged": purged,
        })))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use petwatch_core::traits::ManualClock;
    use petwatch_core::types::SightingId;
    use petwatch_database::MemoryStore;
    use petwatch_entity::job::{CreateJob, JobPayload, JobStatus};

    use super::*;

    #[tokio::test]
    async fn test_requeues_stale_and_purges_old_completed() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let handler = JobCleanupHandler::new(store.clone(), clock.clone(), &WorkerConfig::default());

        let stuck = CreateJob::from_payload(
            &JobPayload::SightingMatch {
                sighting_id: SightingId::new(),
            },
            5,
        )
        .expect("payload");
        let done = CreateJob::from_payload(&JobPayload::JobCleanup, 1).expect("payload");

        let stuck = store.enqueue(&stuck, clock.now()).await.expect("enqueue").expect("new");
        store.dequeue("default", "dead-worker", clock.now()).await.expect("claim");
        let done = store.enqueue(&done, clock.now()).await.expect("enqueue").expect("new");
        store.complete(done.id, clock.now()).await.expect("complete");

        clock.advance(Duration::days(8));
        let job = CreateJob::from_payload(&JobPayload::JobCleanup, 1)
            .expect("payload")
            .into_job(clock.now());
        let out = handler.execute(&job).await.expect("run").expect("result");
        assert_eq!(out["stale_requeued"], 1);
        assert_eq!(out["completed_purged"], 1);

        let stuck = store.find_by_id(stuck.id).await.expect("find").expect("job");
        assert_eq!(stuck.status, JobStatus::Pending);
        assert!(store.find_by_id(done.id).await.expect("find").is_none());
    }
}
