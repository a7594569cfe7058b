//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use petwatch_core::types::{UserId, ZoneId};
use petwatch_entity::zone::AlertZone;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Alert zone as returned to its owner. The ring is given as `[lat, lng]`
/// pairs, matching the creation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneResponse {
    /// Zone ID.
    pub id: ZoneId,
    /// Owner.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Closed ring.
    pub polygon: Vec<[f64; 2]>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<AlertZone> for ZoneResponse {
    fn from(zone: AlertZone) -> Self {
        Self {
            id: zone.id,
            owner_id: zone.owner_id,
            polygon: zone.polygon.ring().iter().map(|p| [p.lat, p.lng]).collect(),
            name: zone.name,
            created_at: zone.created_at,
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: u64,
}

/// Bulk update response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    /// Number of records changed.
    pub marked: u64,
}

/// Delete-if-exists response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    /// Whether anything was removed.
    pub removed: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}
