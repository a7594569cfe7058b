//! Push subscription repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use petwatch_core::error::{AppError, ErrorKind};
use petwatch_core::result::AppResult;
use petwatch_core::types::UserId;
use petwatch_entity::push::PushSubscription;

use crate::store::PushSubscriptionStore;

/// Repository for push subscriptions, unique by endpoint.
#[derive(Debug, Clone)]
pub struct PushSubscriptionRepository {
    pool: PgPool,
}

impl PushSubscriptionRepository {
    /// Create a new push subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PushSubscriptionStore for PushSubscriptionRepository {
    async fn upsert(&self, subscription: &PushSubscription) -> AppResult<PushSubscription> {
        sqlx::query_as::<_, PushSubscription>(
            "INSERT INTO push_subscriptions (id, user_id, endpoint, keys, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (endpoint) DO UPDATE SET user_id = EXCLUDED.user_id, keys = EXCLUDED.keys \
             RETURNING *",
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(&subscription.endpoint)
        .bind(Json(&subscription.keys))
        .bind(subscription.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to save push subscription", e)
        })
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<PushSubscription>> {
        sqlx::query_as::<_, PushSubscription>(
            "SELECT * FROM push_subscriptions WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list push subscriptions", e)
        })
    }

    async fn delete_for_user(&self, user_id: UserId, endpoint: &str) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
                .bind(user_id)
                .bind(endpoint)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to delete push subscription",
                        e,
                    )
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1")
            .bind(endpoint)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete push subscription", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
