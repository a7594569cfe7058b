use async_trait::async_trait;

use petwatch_core::result::AppResult;
use petwatch_core::types::UserId;
use petwatch_entity::push::PushSubscription;

use super::MemoryStore;
use crate::store::PushSubscriptionStore;

#[async_trait]
impl PushSubscriptionStore for MemoryStore {
    async fn upsert(&self, subscription: &PushSubscription) -> AppResult<PushSubscription> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .subscriptions
            .iter_mut()
            .find(|s| s.endpoint == subscription.endpoint)
        {
            existing.user_id = subscription.user_id;
            existing.keys = subscription.keys.clone();
            return Ok(existing.clone());
        }
        state.subscriptions.push(subscription.clone());
        Ok(subscription.clone())
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<PushSubscription>> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_for_user(&self, user_id: UserId, endpoint: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.subscriptions.len();
        state
            .subscriptions
            .retain(|s| !(s.user_id == user_id && s.endpoint == endpoint));
        Ok(state.subscriptions.len() < before)
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.subscriptions.len();
        state.subscriptions.retain(|s| s.endpoint != endpoint);
        Ok(state.subscriptions.len() < before)
    }
}
