//! Notification entity model.

use chrono::{DateTime, Utc};
use petwatch_core::types::{NotificationId, SightingId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::NotificationKind;

/// A durable inbox entry for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// The sighting that triggered it.
    pub sighting_id: SightingId,
    /// Type tag.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Deep link opened from the notification.
    pub link_url: String,
    /// Whether the recipient has read it. Only ever goes false -> true.
    pub is_read: bool,
    /// When it was first read.
    pub read_at: Option<DateTime<Utc>>,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// The recipient.
    pub user_id: UserId,
    /// The triggering sighting.
    pub sighting_id: SightingId,
    /// Type tag.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Deep link.
    pub link_url: String,
}

impl CreateNotification {
    /// Materialize an unread row created at `now`.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.user_id,
            sighting_id: self.sighting_id,
            kind: self.kind,
            title: self.title,
            body: self.body,
            link_url: self.link_url,
            is_read: false,
            read_at: None,
            created_at: now,
        }
    }
}
