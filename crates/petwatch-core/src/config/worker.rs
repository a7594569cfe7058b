//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Longest retry backoff or stale-job threshold accepted, in seconds.
pub const MAX_WORKER_DELAY_SECONDS: u64 = 10 * 365 * 86_400;

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Attempts before a job is left in the failed (dead-letter) state.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    /// Backoff before the first retry, in seconds. Doubles per attempt.
    #[serde(default = "default_retry_base")]
    pub retry_base_seconds: u64,
    /// Upper bound on the retry backoff, in seconds.
    #[serde(default = "default_retry_max")]
    pub retry_max_seconds: u64,
    /// Days completed jobs are kept before the cleanup job purges them.
    #[serde(default = "default_retention_days")]
    pub completed_job_retention_days: i64,
    /// Running jobs claimed longer ago than this are returned to pending
    /// by the cleanup job.
    #[serde(default = "default_stale_after")]
    pub stale_job_after_seconds: u64,
    /// Cron expression for the cleanup job.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
}

impl WorkerConfig {
    /// Backoff applied after the given (1-based) failed attempt.
    pub fn retry_delay_seconds(&self, attempt: i32) -> u64 {
        let exp = attempt.saturating_sub(1).clamp(0, 20) as u32;
        self.retry_base_seconds
            .saturating_mul(2u64.saturating_pow(exp))
            .min(self.retry_max_seconds)
            .min(MAX_WORKER_DELAY_SECONDS)
    }

    /// Stale-job threshold, bounded by [`MAX_WORKER_DELAY_SECONDS`].
    pub fn stale_after_seconds(&self) -> u64 {
        self.stale_job_after_seconds.min(MAX_WORKER_DELAY_SECONDS)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            max_attempts: default_max_attempts(),
            retry_base_seconds: default_retry_base(),
            retry_max_seconds: default_retry_max(),
            completed_job_retention_days: default_retention_days(),
            stale_job_after_seconds: default_stale_after(),
            cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    2
}

fn default_max_attempts() -> i32 {
    5
}

fn default_retry_base() -> u64 {
    10
}

fn default_retry_max() -> u64 {
    900
}

fn default_retention_days() -> i64 {
    7
}

fn default_stale_after() -> u64 {
    1800
}

fn default_cleanup_cron() -> String {
    "0 0 3 * * *".to_string()
}
