//! Push fan-out for stored notifications.

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use petwatch_entity::job::{Job, JobPayload};
use petwatch_service::Notifier;

use crate::executor::{JobExecutionError, JobHandler, decode_payload};

/// Sends a notification to the recipient's push endpoints
#[derive(Debug)]
pub struct PushDeliveryJobHandler {
    /// Notification fan-out
    notifier: Notifier,
}

impl PushDeliveryJobHandler {
    /// Create a new push delivery handler
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl JobHandler for PushDeliveryJobHandler {
    fn job_type(&self) -> &str {
        "push_delivery"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let JobPayload::PushDelivery { notification_id } = decode_payload(job)? else {
            return Err(JobExecutionError::Permanent(format!(
                "Job {} is not a push delivery",
                job.id
            )));
        };

        let report = self.notifier.deliver(notification_id).await?;
        if report.should_retry() {
            return Err(JobExecutionError::Transient(format!(
                "Push delivery failed for all {} endpoint(s)",
                report.failed
            )));
        }

        tracing::debug!(
            notification_id = %notification_id,
            delivered = report.delivered,
            removed = report.removed,
            "Push delivery finished"
        );
        Ok(Some(serde_json::json!({
            "delivered": report.delivered,
            "removed": report.removed,
            "failed": report.failed,
        })))
    }
}
