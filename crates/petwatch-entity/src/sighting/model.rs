//! Sighting entity model.

use chrono::{DateTime, Duration, Utc};
use petwatch_core::types::{SightingId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{PetCategory, SightingStatus};
use crate::geo::GeoPoint;

/// How long a sighting stays in active listings after creation.
pub const SIGHTING_VALIDITY_HOURS: i64 = 48;

/// A report of a pet seen at a place and time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sighting {
    /// Unique sighting identifier.
    pub id: SightingId,
    /// The reporting user.
    pub user_id: UserId,
    /// Latitude of the sighting.
    pub latitude: f64,
    /// Longitude of the sighting.
    pub longitude: f64,
    /// Kind of animal.
    pub category: PetCategory,
    /// Breed, if known.
    pub breed: Option<String>,
    /// Coat or plumage color.
    pub color: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Public URL of an uploaded photo.
    pub photo_url: Option<String>,
    /// Lifecycle state.
    pub status: SightingStatus,
    /// When the sighting was created.
    pub created_at: DateTime<Utc>,
    /// When the sighting was last edited.
    pub updated_at: DateTime<Utc>,
    /// When the sighting drops out of active listings.
    pub expires_at: DateTime<Utc>,
}

impl Sighting {
    /// The sighting location.
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lng: self.longitude,
        }
    }

    /// Whether the sighting is still shown in active listings at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Expiration for a sighting created or renewed at `at`.
    pub fn expiry_from(at: DateTime<Utc>) -> DateTime<Utc> {
        at + Duration::hours(SIGHTING_VALIDITY_HOURS)
    }

    /// Whether the free-text fields mention `needle` (case-insensitive).
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [Some(&self.description), self.breed.as_ref(), self.color.as_ref()]
            .into_iter()
            .flatten()
            .any(|s| s.to_lowercase().contains(&needle))
    }
}

/// Validated data for a new sighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSighting {
    /// Where the pet was seen.
    pub location: GeoPoint,
    /// Kind of animal.
    pub category: PetCategory,
    /// Breed, if known.
    pub breed: Option<String>,
    /// Color, if known.
    pub color: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Photo URL.
    pub photo_url: Option<String>,
    /// Initial lifecycle state.
    pub status: SightingStatus,
}

impl CreateSighting {
    /// Materialize the row for `user_id` created at `now`.
    pub fn into_sighting(self, user_id: UserId, now: DateTime<Utc>) -> Sighting {
        Sighting {
            id: SightingId::new(),
            user_id,
            latitude: self.location.lat,
            longitude: self.location.lng,
            category: self.category,
            breed: self.breed,
            color: self.color,
            description: self.description,
            photo_url: self.photo_url,
            status: self.status,
            created_at: now,
            updated_at: now,
            expires_at: Sighting::expiry_from(now),
        }
    }
}

/// Owner edit of an existing sighting. Absent fields are left unchanged.
///
/// The optional text fields are tri-state: `None` keeps the current value,
/// `Some(None)` clears it, `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSighting {
    /// New location.
    pub location: Option<GeoPoint>,
    /// New category.
    pub category: Option<PetCategory>,
    /// New or cleared breed.
    pub breed: Option<Option<String>>,
    /// New or cleared color.
    pub color: Option<Option<String>>,
    /// New description.
    pub description: Option<String>,
    /// New or cleared photo URL.
    pub photo_url: Option<Option<String>>,
    /// New lifecycle state.
    pub status: Option<SightingStatus>,
}

impl UpdateSighting {
    /// Apply the patch in place.
    pub fn apply_to(self, sighting: &mut Sighting) {
        if let Some(loc) = self.location {
            sighting.latitude = loc.lat;
            sighting.longitude = loc.lng;
        }
        if let Some(category) = self.category {
            sighting.category = category;
        }
        if let Some(breed) = self.breed {
            sighting.breed = breed;
        }
        if let Some(color) = self.color {
            sighting.color = color;
        }
        if let Some(description) = self.description {
            sighting.description = description;
        }
        if let Some(photo_url) = self.photo_url {
            sighting.photo_url = photo_url;
        }
        if let Some(status) = self.status {
            sighting.status = status;
        }
    }
}

/// Filter for active sighting searches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SightingFilter {
    /// Lifecycle states to include; empty means all.
    pub statuses: Vec<SightingStatus>,
    /// Categories to include; empty means all.
    pub categories: Vec<PetCategory>,
    /// Case-insensitive text over description, breed, and color.
    pub text: Option<String>,
    /// Rank results by distance from this point instead of by recency.
    pub near: Option<GeoPoint>,
}

impl SightingFilter {
    /// Whether `s` passes the state, category, and text criteria.
    pub fn matches(&self, s: &Sighting) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&s.status))
            && (self.categories.is_empty() || self.categories.contains(&s.category))
            && self.text.as_deref().is_none_or(|t| s.matches_text(t))
    }
}
