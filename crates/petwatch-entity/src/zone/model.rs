//! Alert zone entity model.

use chrono::{DateTime, Utc};
use petwatch_core::types::{UserId, ZoneId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::geo::Polygon;

/// Longest accepted zone name, in characters.
pub const ZONE_NAME_MAX_LEN: usize = 100;

/// A user-drawn region that triggers notifications for new sightings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AlertZone {
    /// Unique zone identifier.
    pub id: ZoneId,
    /// The owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Closed polygon ring.
    #[sqlx(json)]
    pub polygon: Polygon,
    /// When the zone was created.
    pub created_at: DateTime<Utc>,
}

/// A zone that contains a sighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMatch {
    /// The matching zone.
    pub zone_id: ZoneId,
    /// Its owner.
    pub owner_id: UserId,
    /// Its name, used in the notification text.
    pub zone_name: String,
}

impl From<&AlertZone> for ZoneMatch {
    fn from(z: &AlertZone) -> Self {
        Self {
            zone_id: z.id,
            owner_id: z.owner_id,
            zone_name: z.name.clone(),
        }
    }
}
