//! Sighting repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use petwatch_core::config::RateLimitConfig;
use petwatch_core::error::{AppError, ErrorKind};
use petwatch_core::result::AppResult;
use petwatch_core::types::{PageRequest, PageResponse, SightingId, UserId};
use petwatch_entity::job::CreateJob;
use petwatch_entity::sighting::{
    PetCategory, Sighting, SightingDetails, SightingFilter, SightingStatus,
};

use super::job::insert_job;
use crate::store::{InsertOutcome, SightingStore, retry_after_seconds, window_start};

/// Active-listing filter shared by the search and count queries.
const ACTIVE_FILTER: &str = "expires_at > $1 \
     AND (cardinality($2::sighting_status[]) = 0 OR status = ANY($2)) \
     AND (cardinality($3::pet_category[]) = 0 OR category = ANY($3)) \
     AND ($4::text IS NULL OR description ILIKE $4 OR breed ILIKE $4 OR color ILIKE $4)";

/// Ordering for searches: distance from (`$7`, `$8`) when given, then recency.
const SEARCH_ORDER: &str = "CASE WHEN $7::float8 IS NULL THEN 0 \
     ELSE (latitude - $7) ^ 2 + ((longitude - $8) * cos(radians($7))) ^ 2 END, \
     created_at DESC";

/// Repository for sighting persistence and rate-limited inserts.
#[derive(Debug, Clone)]
pub struct SightingRepository {
    pool: PgPool,
}

impl SightingRepository {
    /// Create a new sighting repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// `%text%` with LIKE wildcards escaped.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl SightingStore for SightingRepository {
    async fn insert_if_allowed(
        &self,
        sighting: &Sighting,
        limit: &RateLimitConfig,
        follow_up: &CreateJob,
    ) -> AppResult<InsertOutcome> {
        let now = sighting.created_at;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin sighting transaction"))?;

        // Serializes submissions per user until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(sighting.user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to take rate-limit lock"))?;

        let (count, oldest): (i64, Option<DateTime<Utc>>) = sqlx::query_as(
            "SELECT COUNT(*), MIN(created_at) FROM sightings WHERE user_id = $1 AND created_at > $2",
        )
        .bind(sighting.user_id)
        .bind(window_start(now, limit.window_seconds))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to count recent sightings"))?;

        if count >= i64::from(limit.max_per_window) {
            let oldest = oldest.unwrap_or(now);
            return Ok(InsertOutcome::RateLimited {
                retry_after_seconds: retry_after_seconds(oldest, limit.window_seconds, now),
            });
        }

        let stored = sqlx::query_as::<_, Sighting>(
            "INSERT INTO sightings (id, user_id, latitude, longitude, category, breed, color, \
             description, photo_url, status, created_at, updated_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(sighting.id)
        .bind(sighting.user_id)
        .bind(sighting.latitude)
        .bind(sighting.longitude)
        .bind(sighting.category)
        .bind(&sighting.breed)
        .bind(&sighting.color)
        .bind(&sighting.description)
        .bind(&sighting.photo_url)
        .bind(sighting.status)
        .bind(sighting.created_at)
        .bind(sighting.updated_at)
        .bind(sighting.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to insert sighting"))?;

        insert_job(&mut *tx, follow_up, now)
            .await
            .map_err(db_err("Failed to enqueue sighting follow-up"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit sighting transaction"))?;

        Ok(InsertOutcome::Inserted(stored))
    }

    async fn find_by_id(&self, id: SightingId) -> AppResult<Option<Sighting>> {
        sqlx::query_as::<_, Sighting>("SELECT * FROM sightings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find sighting"))
    }

    async fn find_details(&self, id: SightingId) -> AppResult<Option<SightingDetails>> {
        sqlx::query_as::<_, SightingDetails>("SELECT * FROM sightings_with_details WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find sighting"))
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<SightingDetails>> {
        sqlx::query_as::<_, SightingDetails>(
            "SELECT * FROM sightings_with_details WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list user sightings"))
    }

    async fn search_active(
        &self,
        filter: &SightingFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<SightingDetails>> {
        let statuses: &[SightingStatus] = &filter.statuses;
        let categories: &[PetCategory] = &filter.categories;
        let pattern = filter
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(like_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM sightings WHERE {ACTIVE_FILTER}"
        ))
        .bind(now)
        .bind(statuses)
        .bind(categories)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count sightings"))?;

        let items = sqlx::query_as::<_, SightingDetails>(&format!(
            "SELECT * FROM sightings_with_details WHERE {ACTIVE_FILTER} \
             ORDER BY {SEARCH_ORDER} LIMIT $5 OFFSET $6"
        ))
        .bind(now)
        .bind(statuses)
        .bind(categories)
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .bind(filter.near.map(|p| p.lat))
        .bind(filter.near.map(|p| p.lng))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to search sightings"))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    async fn latest_active(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<SightingDetails>> {
        sqlx::query_as::<_, SightingDetails>(
            "SELECT * FROM sightings_with_details WHERE expires_at > $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list latest sightings"))
    }

    async fn update(&self, sighting: &Sighting) -> AppResult<Sighting> {
        sqlx::query_as::<_, Sighting>(
            "UPDATE sightings SET latitude = $2, longitude = $3, category = $4, breed = $5, \
             color = $6, description = $7, photo_url = $8, status = $9, updated_at = $10, \
             expires_at = $11 WHERE id = $1 RETURNING *",
        )
        .bind(sighting.id)
        .bind(sighting.latitude)
        .bind(sighting.longitude)
        .bind(sighting.category)
        .bind(&sighting.breed)
        .bind(&sighting.color)
        .bind(&sighting.description)
        .bind(&sighting.photo_url)
        .bind(sighting.status)
        .bind(sighting.updated_at)
        .bind(sighting.expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update sighting"))?
        .ok_or_else(|| AppError::not_found(format!("Sighting {} not found", sighting.id)))
    }

    async fn delete(&self, id: SightingId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sightings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete sighting"))?;
        Ok(result.rows_affected() > 0)
    }
}
