//! Alert zone repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use petwatch_core::error::{AppError, ErrorKind};
use petwatch_core::result::AppResult;
use petwatch_core::types::{UserId, ZoneId};
use petwatch_entity::geo::GeoPoint;
use petwatch_entity::zone::AlertZone;

use crate::store::ZoneStore;

/// Repository for alert zones. Rings are stored as JSONB with denormalized
/// bounding-box columns for candidate lookups.
#[derive(Debug, Clone)]
pub struct ZoneRepository {
    pool: PgPool,
}

impl ZoneRepository {
    /// Create a new zone repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ZoneStore for ZoneRepository {
    async fn insert(&self, zone: &AlertZone) -> AppResult<AlertZone> {
        let bbox = zone.polygon.bounding_box();
        sqlx::query_as::<_, AlertZone>(
            "INSERT INTO alert_zones (id, owner_id, name, polygon, min_lat, max_lat, min_lng, \
             max_lng, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(zone.id)
        .bind(zone.owner_id)
        .bind(&zone.name)
        .bind(Json(&zone.polygon))
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lng)
        .bind(bbox.max_lng)
        .bind(zone.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create zone", e))
    }

    async fn find_by_id(&self, id: ZoneId) -> AppResult<Option<AlertZone>> {
        sqlx::query_as::<_, AlertZone>("SELECT * FROM alert_zones WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find zone", e))
    }

    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<AlertZone>> {
        sqlx::query_as::<_, AlertZone>(
            "SELECT * FROM alert_zones WHERE owner_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list zones", e))
    }

    async fn find_candidates(&self, point: &GeoPoint) -> AppResult<Vec<AlertZone>> {
        sqlx::query_as::<_, AlertZone>(
            "SELECT * FROM alert_zones \
             WHERE min_lat <= $1 AND max_lat >= $1 AND min_lng <= $2 AND max_lng >= $2",
        )
        .bind(point.lat)
        .bind(point.lng)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find candidate zones", e)
        })
    }

    async fn delete(&self, id: ZoneId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alert_zones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete zone", e))?;
        Ok(result.rows_affected() > 0)
    }
}
