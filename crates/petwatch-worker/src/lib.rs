//! Background job processing and scheduled tasks for PetWatch.
//!
//! This crate provides:
//! - A job queue over the durable outbox table
//! - A worker runner that polls for due jobs and retries with backoff
//! - A job executor that dispatches jobs to the correct handler
//! - Handlers for zone matching, push delivery, and queue cleanup
//! - A cron scheduler for the periodic cleanup

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::JobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
