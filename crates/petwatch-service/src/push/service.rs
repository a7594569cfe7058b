use std::sync::Arc;

use tracing::info;

use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::SubscriptionId;
use petwatch_database::store::PushSubscriptionStore;
use petwatch_entity::push::{PushKeys, PushSubscription};

use crate::context::RequestContext;

/// Longest accepted endpoint URL.
const MAX_ENDPOINT_LEN: usize = 2048;

/// Registers and removes the caller's push endpoints.
#[derive(Clone)]
pub struct PushSubscriptionService {
    subscriptions: Arc<dyn PushSubscriptionStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PushSubscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushSubscriptionService").finish_non_exhaustive()
    }
}

impl PushSubscriptionService {
    /// Creates a new push subscription service.
    pub fn new(subscriptions: Arc<dyn PushSubscriptionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            subscriptions,
            clock,
        }
    }

    /// Registers an endpoint for the caller. Re-registering an endpoint
    /// replaces its keys and moves it to the caller.
    pub async fn subscribe(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        keys: PushKeys,
    ) -> Result<PushSubscription, AppError> {
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(AppError::invalid_field("endpoint", "must be an http(s) URL"));
        }
        if endpoint.len() > MAX_ENDPOINT_LEN {
            return Err(AppError::invalid_field(
                "endpoint",
                format!("must be at most {MAX_ENDPOINT_LEN} characters"),
            ));
        }
        if keys.p256dh.trim().is_empty() {
            return Err(AppError::invalid_field("keys.p256dh", "must not be empty"));
        }
        if keys.auth.trim().is_empty() {
            return Err(AppError::invalid_field("keys.auth", "must not be empty"));
        }

        let subscription = PushSubscription {
            id: SubscriptionId::new(),
            user_id: ctx.user_id,
            endpoint: endpoint.to_string(),
            keys,
            created_at: self.clock.now(),
        };
        let saved = self.subscriptions.upsert(&subscription).await?;
        info!(subscription_id = %saved.id, user_id = %ctx.user_id, "Push subscription registered");
        Ok(saved)
    }

    /// Removes the caller's registration for `endpoint`. Returns whether
    /// anything was removed.
    pub async fn unsubscribe(&self, ctx: &RequestContext, endpoint: &str) -> Result<bool, AppError> {
        let removed = self
            .subscriptions
            .delete_for_user(ctx.user_id, endpoint.trim())
            .await?;
        if removed {
            info!(user_id = %ctx.user_id, "Push subscription removed");
        }
        Ok(removed)
    }

    /// The caller's registered endpoints.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<PushSubscription>, AppError> {
        self.subscriptions.find_by_user(ctx.user_id).await
    }
}
