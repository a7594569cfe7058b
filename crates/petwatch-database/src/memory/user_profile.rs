use async_trait::async_trait;

use petwatch_core::result::AppResult;
use petwatch_core::types::UserId;
use petwatch_entity::user::UserProfile;

use super::MemoryStore;
use crate::store::UserProfileStore;

#[async_trait]
impl UserProfileStore for MemoryStore {
    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        let mut state = self.state.write().await;
        match state
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            Some(existing) => *existing = profile.clone(),
            None => state.profiles.push(profile.clone()),
        }
        Ok(profile.clone())
    }

    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let state = self.state.read().await;
        Ok(state.profile(user_id).cloned())
    }
}
