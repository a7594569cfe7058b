use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use petwatch_core::config::NotificationConfig;
use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::{NotificationId, UserId};
use petwatch_database::store::{JobStore, NotificationStore, PushSubscriptionStore};
use petwatch_entity::job::{CreateJob, JobPayload};
use petwatch_entity::notification::{CreateNotification, Notification, NotificationKind};
use petwatch_entity::push::{PushMessage, PushMessageData};
use petwatch_entity::sighting::Sighting;
use petwatch_entity::zone::ZoneMatch;
use petwatch_push::{PushOutcome, PushTransport};

/// Per-endpoint tally for one push delivery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Endpoints that accepted the message.
    pub delivered: usize,
    /// Endpoints reported gone and removed.
    pub removed: usize,
    /// Endpoints that failed for any other reason.
    pub failed: usize,
}

impl DeliveryReport {
    /// Whether the run should be attempted again. Only when nothing got
    /// through, so endpoints that already accepted are not spammed.
    pub fn should_retry(&self) -> bool {
        self.failed > 0 && self.delivered == 0
    }
}

/// Creates one notification per recipient and fans it out to their push
/// endpoints.
#[derive(Clone)]
pub struct Notifier {
    notifications: Arc<dyn NotificationStore>,
    subscriptions: Arc<dyn PushSubscriptionStore>,
    jobs: Arc<dyn JobStore>,
    transport: Arc<dyn PushTransport>,
    clock: Arc<dyn Clock>,
    config: NotificationConfig,
    job_max_attempts: i32,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Creates a new notifier.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        subscriptions: Arc<dyn PushSubscriptionStore>,
        jobs: Arc<dyn JobStore>,
        transport: Arc<dyn PushTransport>,
        clock: Arc<dyn Clock>,
        config: NotificationConfig,
        job_max_attempts: i32,
    ) -> Self {
        Self {
            notifications,
            subscriptions,
            jobs,
            transport,
            clock,
            config,
            job_max_attempts,
        }
    }

    /// Records one notification per distinct zone owner and schedules its
    /// push delivery.
    ///
    /// Safe to replay: an owner already notified about this sighting keeps
    /// the existing row, and the push job is deduplicated per notification.
    pub async fn notify_matches(
        &self,
        sighting: &Sighting,
        matches: &[ZoneMatch],
    ) -> Result<Vec<Notification>, AppError> {
        let mut recipients: Vec<(UserId, &str)> = Vec::new();
        for m in matches {
            if m.owner_id == sighting.user_id && !self.config.notify_sighting_owner {
                continue;
            }
            if !recipients.iter().any(|(owner, _)| *owner == m.owner_id) {
                recipients.push((m.owner_id, m.zone_name.as_str()));
            }
        }

        let now = self.clock.now();
        let mut created = Vec::with_capacity(recipients.len());
        for (owner_id, zone_name) in recipients {
            let data = CreateNotification {
                user_id: owner_id,
                sighting_id: sighting.id,
                kind: NotificationKind::ZoneMatch,
                title: self.config.title.clone(),
                body: summary(sighting, zone_name),
                link_url: self.sighting_link(sighting),
            };
            let (notification, is_new) = self.notifications.create_if_absent(&data, now).await?;
            if is_new {
                info!(
                    notification_id = %notification.id,
                    user_id = %owner_id,
                    sighting_id = %sighting.id,
                    "Zone match notification created"
                );
            }

            let job = CreateJob::from_payload(
                &JobPayload::PushDelivery {
                    notification_id: notification.id,
                },
                self.job_max_attempts,
            )?;
            if self.jobs.enqueue(&job, now).await?.is_none() {
                debug!(notification_id = %notification.id, "Push delivery already scheduled");
            }
            created.push(notification);
        }
        Ok(created)
    }

    /// Sends a stored notification to every endpoint of its recipient.
    ///
    /// Endpoints reported gone are deleted. A notification that no longer
    /// exists (its sighting was deleted) is a no-op.
    pub async fn deliver(&self, notification_id: NotificationId) -> Result<DeliveryReport, AppError> {
        let mut report = DeliveryReport::default();
        let Some(notification) = self.notifications.find_by_id(notification_id).await? else {
            debug!(notification_id = %notification_id, "Notification gone, skipping push");
            return Ok(report);
        };

        let message = PushMessage {
            title: notification.title.clone(),
            body: notification.body.clone(),
            data: PushMessageData {
                url: notification.link_url.clone(),
                sighting_id: notification.sighting_id,
                notification_id: notification.id,
            },
        };

        for subscription in self.subscriptions.find_by_user(notification.user_id).await? {
            match self.transport.send(&subscription, &message).await {
                PushOutcome::Delivered => report.delivered += 1,
                PushOutcome::Gone => {
                    self.subscriptions
                        .delete_by_endpoint(&subscription.endpoint)
                        .await?;
                    info!(
                        subscription_id = %subscription.id,
                        user_id = %subscription.user_id,
                        "Removed expired push subscription"
                    );
                    report.removed += 1;
                }
                PushOutcome::Failed(reason) => {
                    warn!(
                        subscription_id = %subscription.id,
                        error = %reason,
                        "Push delivery failed"
                    );
                    report.failed += 1;
                }
            }
        }

        debug!(
            notification_id = %notification_id,
            delivered = report.delivered,
            removed = report.removed,
            failed = report.failed,
            "Push fan-out finished"
        );
        Ok(report)
    }

    fn sighting_link(&self, sighting: &Sighting) -> String {
        format!(
            "{}/sightings/{}",
            self.config.public_base_url.trim_end_matches('/'),
            sighting.id
        )
    }
}

fn summary(sighting: &Sighting, zone_name: &str) -> String {
    format!(
        "New {} {} reported in your zone \"{zone_name}\"",
        sighting.status.as_str().replace('_', " "),
        sighting.category
    )
}
