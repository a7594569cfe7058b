use async_trait::async_trait;
use chrono::{DateTime, Utc};

use petwatch_core::result::AppResult;
use petwatch_core::types::JobId;
use petwatch_entity::job::{CreateJob, Job, JobStatus};

use super::MemoryStore;
use crate::store::JobStore;

/// Append a job unless its dedupe key is already taken.
pub(super) fn insert_job(jobs: &mut Vec<Job>, data: &CreateJob, now: DateTime<Utc>) -> Option<Job> {
    if let Some(key) = &data.dedupe_key {
        if jobs.iter().any(|j| j.dedupe_key.as_ref() == Some(key)) {
            return None;
        }
    }
    let job = data.clone().into_job(now);
    jobs.push(job.clone());
    Some(job)
}

impl MemoryStore {
    fn with_job(jobs: &mut [Job], id: JobId, f: impl FnOnce(&mut Job)) {
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            f(job);
        }
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn enqueue(&self, data: &CreateJob, now: DateTime<Utc>) -> AppResult<Option<Job>> {
        let mut state = self.state.write().await;
        Ok(insert_job(&mut state.jobs, data, now))
    }

    async fn dequeue(
        &self,
        queue: &str,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Job>> {
        let mut state = self.state.write().await;
        let next = state
            .jobs
            .iter_mut()
            .filter(|j| j.queue == queue && j.status == JobStatus::Pending && j.scheduled_at <= now)
            .min_by(|a, b| {
                b.priority
                    .numeric_priority()
                    .cmp(&a.priority.numeric_priority())
                    .then(a.scheduled_at.cmp(&b.scheduled_at))
            });

        Ok(next.map(|job| {
            job.status = JobStatus::Running;
            job.started_at = Some(now);
            job.worker_id = Some(worker_id.to_string());
            job.attempts += 1;
            job.updated_at = now;
            job.clone()
        }))
    }

    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>> {
        let state = self.state.read().await;
        Ok(state.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn find_by_status(&self, status: JobStatus, limit: u64) -> AppResult<Vec<Job>> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .iter()
            .filter(|j| j.status == status)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn complete(&self, id: JobId, now: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.write().await;
        Self::with_job(&mut state.jobs, id, |job| {
            job.status = JobStatus::Completed;
            job.error_message = None;
            job.completed_at = Some(now);
            job.updated_at = now;
        });
        Ok(())
    }

    async fn reschedule(
        &self,
        id: JobId,
        error_message: &str,
        retry_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        Self::with_job(&mut state.jobs, id, |job| {
            job.status = JobStatus::Pending;
            job.error_message = Some(error_message.to_string());
            job.scheduled_at = retry_at;
            job.worker_id = None;
            job.updated_at = now;
        });
        Ok(())
    }

    async fn fail(&self, id: JobId, error_message: &str, now: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.write().await;
        Self::with_job(&mut state.jobs, id, |job| {
            job.status = JobStatus::Failed;
            job.error_message = Some(error_message.to_string());
            job.completed_at = Some(now);
            job.updated_at = now;
        });
        Ok(())
    }

    async fn requeue_stale(
        &self,
        started_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut count = 0;
        for job in state.jobs.iter_mut().filter(|j| {
            j.status == JobStatus::Running && j.started_at.is_some_and(|t| t < started_before)
        }) {
            job.status = JobStatus::Pending;
            job.worker_id = None;
            job.scheduled_at = now;
            job.updated_at = now;
            count += 1;
        }
        Ok(count)
    }

    async fn purge_completed(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before_len = state.jobs.len();
        state
            .jobs
            .retain(|j| !(j.status == JobStatus::Completed && j.updated_at < before));
        Ok((before_len - state.jobs.len()) as u64)
    }
}
