//! Push subscription entity model.

use chrono::{DateTime, Utc};
use petwatch_core::types::{NotificationId, SightingId, SubscriptionId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Browser-issued encryption keys for a push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    /// Client public key.
    pub p256dh: String,
    /// Authentication secret.
    pub auth: String,
}

/// An endpoint that receives out-of-band alerts for one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PushSubscription {
    /// Unique subscription identifier.
    pub id: SubscriptionId,
    /// The owning user.
    pub user_id: UserId,
    /// Push service endpoint URL. Unique across users.
    pub endpoint: String,
    /// Encryption keys.
    #[sqlx(json)]
    pub keys: PushKeys,
    /// When the subscription was registered.
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    /// The subscription in the shape browsers hand out and gateways expect.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "endpoint": self.endpoint,
            "keys": self.keys,
        })
    }
}

/// The message delivered through the push transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Title shown by the device.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Data handed to the client on click.
    pub data: PushMessageData,
}

/// Click-through data carried by a push message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessageData {
    /// URL the client opens.
    pub url: String,
    /// Related sighting.
    pub sighting_id: SightingId,
    /// Related notification.
    pub notification_id: NotificationId,
}
