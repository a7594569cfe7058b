//! Reading and editing the caller's contact details.

use std::sync::Arc;

use tracing::info;

use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_database::store::UserProfileStore;
use petwatch_entity::user::UserProfile;

use super::input::ProfilePatch;
use crate::context::RequestContext;

/// Maintains the display name and phone attached to a user's sightings.
#[derive(Clone)]
pub struct UserProfileService {
    profiles: Arc<dyn UserProfileStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for UserProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProfileService").finish_non_exhaustive()
    }
}

impl UserProfileService {
    /// Creates a new user profile service.
    pub fn new(profiles: Arc<dyn UserProfileStore>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }

    /// The caller's profile; empty if they never set one.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<UserProfile, AppError> {
        Ok(self
            .profiles
            .find_profile(ctx.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(ctx.user_id, ctx.request_time)))
    }

    /// Applies an edit to the caller's profile, creating it on first use.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        patch: ProfilePatch,
    ) -> Result<UserProfile, AppError> {
        let update = patch.validate()?;
        let mut profile = self.get_profile(ctx).await?;
        update.apply_to(&mut profile, self.clock.now());

        let saved = self.profiles.upsert_profile(&profile).await?;
        info!(
            user_id = %ctx.user_id,
            has_phone = saved.phone.is_some(),
            "User profile updated"
        );
        Ok(saved)
    }
}
