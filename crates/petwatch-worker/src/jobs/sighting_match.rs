//! Zone matching for newly submitted sightings.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use petwatch_core::traits::Clock;
use petwatch_database::store::SightingStore;
use petwatch_entity::job::{Job, JobPayload};
use petwatch_service::{Notifier, ZoneMatcher};

use crate::executor::{JobExecutionError, JobHandler, decode_payload};

/// Matches a sighting against every alert zone and notifies the owners
pub struct SightingMatchJobHandler {
    /// Sighting lookup
    sightings: Arc<dyn SightingStore>,
    /// Point-in-polygon matcher
    matcher: ZoneMatcher,
    /// Notification fan-out
    notifier: Notifier,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SightingMatchJobHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SightingMatchJobHandler")
            .field("matcher", &self.matcher)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl SightingMatchJobHandler {
    /// Create a new sighting match handler
    pub fn new(
        sightings: Arc<dyn SightingStore>,
        matcher: ZoneMatcher,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sightings,
            matcher,
            notifier,
            clock,
        }
    }
}

#[async_trait]
impl JobHandler for SightingMatchJobHandler {
    fn job_type(&self) -> &str {
        "sighting_match"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let JobPayload::SightingMatch { sighting_id } = decode_payload(job)? else {
            return Err(JobExecutionError::Permanent(format!(
                "Job {} is not a sighting match",
                job.id
            )));
        };

        let Some(sighting) = self.sightings.find_by_id(sighting_id).await? else {
            tracing::info!(sighting_id = %sighting_id, "Sighting deleted before matching");
            return Ok(Some(serde_json::json!({ "skipped": "deleted" })));
        };
        if !sighting.is_active(self.clock.now()) {
            tracing::info!(sighting_id = %sighting_id, "Sighting expired before matching");
            return Ok(Some(serde_json::json!({ "skipped": "expired" })));
        }

        let matches = self.matcher.match_zones(&sighting).await?;
        let notified = self.notifier.notify_matches(&sighting, &matches).await?;

        tracing::info!(
            sighting_id = %sighting_id,
            zones = matches.len(),
            recipients = notified.len(),
            "Sighting matched against alert zones"
        );

        Ok(Some(serde_json::json!({
            "zones_matched": matches.len(),
            "notifications": notified.len(),
        })))
    }
}
