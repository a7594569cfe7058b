//! The push transport seam.

use async_trait::async_trait;
use tracing::debug;

use petwatch_entity::push::{PushMessage, PushSubscription};

/// Result of one delivery attempt to one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Accepted by the push service.
    Delivered,
    /// The endpoint no longer exists; the subscription should be dropped.
    Gone,
    /// Any other failure. Worth retrying later.
    Failed(String),
}

/// Sends a message to one subscription.
#[async_trait]
pub trait PushTransport: Send + Sync + 'static {
    /// Deliver `message` to `subscription`.
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> PushOutcome;
}

/// Transport used when push is disabled. Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTransport;

#[async_trait]
impl PushTransport for DisabledTransport {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> PushOutcome {
        debug!(
            user_id = %subscription.user_id,
            notification_id = %message.data.notification_id,
            "Push disabled, skipping delivery"
        );
        PushOutcome::Delivered
    }
}
