//! Typed job payload definitions.

use petwatch_core::types::{NotificationId, SightingId};
use serde::{Deserialize, Serialize};

use super::status::JobPriority;

/// Typed payloads for known job types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job_type")]
pub enum JobPayload {
    /// Match a new sighting against alert zones and notify owners.
    #[serde(rename = "sighting_match")]
    SightingMatch {
        /// The sighting to match.
        sighting_id: SightingId,
    },
    /// Send one notification to the recipient's push endpoints.
    #[serde(rename = "push_delivery")]
    PushDelivery {
        /// The notification to deliver.
        notification_id: NotificationId,
    },
    /// Purge old completed jobs.
    #[serde(rename = "job_cleanup")]
    JobCleanup,
}

impl JobPayload {
    /// Job type identifier.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::SightingMatch { .. } => "sighting_match",
            Self::PushDelivery { .. } => "push_delivery",
            Self::JobCleanup => "job_cleanup",
        }
    }

    /// Key that makes enqueueing this payload idempotent.
    pub fn dedupe_key(&self) -> Option<String> {
        match self {
            Self::SightingMatch { sighting_id } => Some(format!("match:{sighting_id}")),
            Self::PushDelivery { notification_id } => Some(format!("push:{notification_id}")),
            Self::JobCleanup => None,
        }
    }

    /// Priority used when none is given.
    pub fn default_priority(&self) -> JobPriority {
        match self {
            Self::SightingMatch { .. } => JobPriority::High,
            Self::PushDelivery { .. } => JobPriority::Normal,
            Self::JobCleanup => JobPriority::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tagged_by_job_type() {
        let id = SightingId::new();
        let value = serde_json::to_value(JobPayload::SightingMatch { sighting_id: id }).expect("ser");
        assert_eq!(value["job_type"], "sighting_match");
        assert_eq!(value["sighting_id"], id.to_string());

        let back: JobPayload = serde_json::from_value(value).expect("de");
        assert_eq!(back.dedupe_key(), Some(format!("match:{id}")));
    }

    #[test]
    fn test_cleanup_has_no_dedupe_key() {
        assert_eq!(JobPayload::JobCleanup.dedupe_key(), None);
        assert_eq!(JobPayload::JobCleanup.job_type(), "job_cleanup");
    }
}
