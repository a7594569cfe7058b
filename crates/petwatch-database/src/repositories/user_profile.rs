//! User profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use petwatch_core::error::{AppError, ErrorKind};
use petwatch_core::result::AppResult;
use petwatch_core::types::UserId;
use petwatch_entity::user::UserProfile;

use crate::store::UserProfileStore;

/// Repository for user contact details, one row per user.
#[derive(Debug, Clone)]
pub struct UserProfileRepository {
    pool: PgPool,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserProfileStore for UserProfileRepository {
    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, display_name, phone, updated_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET display_name = EXCLUDED.display_name, \
             phone = EXCLUDED.phone, updated_at = EXCLUDED.updated_at \
             RETURNING *",
        )
        .bind(profile.user_id)
        .bind(&profile.display_name)
        .bind(&profile.phone)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save user profile", e))
    }

    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user profile", e)
            })
    }
}
