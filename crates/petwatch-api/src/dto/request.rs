//! Request DTOs with validation.
//!
//! Bodies reject unknown fields so that misspelled or unexpected keys are
//! reported instead of silently dropped.

use serde::Deserialize;
use validator::Validate;

use petwatch_core::error::AppError;
use petwatch_core::types::{CommentId, PageRequest};
use petwatch_entity::geo::GeoPoint;
use petwatch_entity::push::PushKeys;
use petwatch_entity::sighting::{PetCategory, SightingFilter, SightingStatus};
use petwatch_service::{CommentDraft, ProfilePatch, SightingDraft, SightingPatch};

/// Sighting submission body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SubmitSightingRequest {
    /// Latitude in decimal degrees.
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
    /// Kind of animal.
    pub category: PetCategory,
    /// Breed, if known.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub breed: Option<String>,
    /// Color, if known.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub color: Option<String>,
    /// Free-text description.
    #[validate(length(min = 1, max = 2000, message = "must be 1 to 2000 characters"))]
    pub description: String,
    /// Photo URL.
    #[validate(url(message = "must be a valid URL"))]
    pub photo_url: Option<String>,
    /// Lifecycle state.
    pub status: SightingStatus,
}

impl From<SubmitSightingRequest> for SightingDraft {
    fn from(req: SubmitSightingRequest) -> Self {
        Self {
            latitude: req.latitude,
            longitude: req.longitude,
            category: req.category,
            breed: req.breed,
            color: req.color,
            description: req.description,
            photo_url: req.photo_url,
            status: req.status,
        }
    }
}

/// Sighting edit body. Absent fields are left unchanged; an empty
/// `breed`, `color`, or `photo_url` clears it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSightingRequest {
    /// New latitude; requires `longitude`.
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: Option<f64>,
    /// New longitude; requires `latitude`.
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: Option<f64>,
    /// New category.
    pub category: Option<PetCategory>,
    /// New breed.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub breed: Option<String>,
    /// New color.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub color: Option<String>,
    /// New description.
    #[validate(length(min = 1, max = 2000, message = "must be 1 to 2000 characters"))]
    pub description: Option<String>,
    /// New photo URL. Checked by the service so that `""` can clear it.
    pub photo_url: Option<String>,
    /// New lifecycle state.
    pub status: Option<SightingStatus>,
}

impl From<UpdateSightingRequest> for SightingPatch {
    fn from(req: UpdateSightingRequest) -> Self {
        Self {
            latitude: req.latitude,
            longitude: req.longitude,
            category: req.category,
            breed: req.breed,
            color: req.color,
            description: req.description,
            photo_url: req.photo_url,
            status: req.status,
        }
    }
}

/// Profile edit body. Absent fields are left unchanged; an empty string
/// clears the field.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    /// Name shown next to the caller's sightings.
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub display_name: Option<String>,
    /// Contact phone.
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            phone: req.phone,
        }
    }
}

/// Comment body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    /// Comment text.
    #[validate(length(min = 1, max = 2000, message = "must be 1 to 2000 characters"))]
    pub body: String,
    /// Comment being replied to.
    pub parent_id: Option<CommentId>,
}

impl From<CreateCommentRequest> for CommentDraft {
    fn from(req: CreateCommentRequest) -> Self {
        Self {
            body: req.body,
            parent_id: req.parent_id,
        }
    }
}

/// Zone creation body. `polygon` is a list of `[lat, lng]` pairs.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateZoneRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,
    /// Vertices as `[lat, lng]`.
    pub polygon: Vec<[f64; 2]>,
}

impl CreateZoneRequest {
    /// Vertices as points, in input order.
    pub fn vertices(&self) -> Vec<GeoPoint> {
        self.polygon
            .iter()
            .map(|[lat, lng]| GeoPoint { lat: *lat, lng: *lng })
            .collect()
    }
}

/// Push subscription body, as produced by the browser Push API.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    /// Push service endpoint.
    #[validate(url(message = "must be a valid URL"))]
    pub endpoint: String,
    /// Encryption keys.
    pub keys: PushKeysRequest,
}

/// Push subscription keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushKeysRequest {
    /// Client public key.
    pub p256dh: String,
    /// Authentication secret.
    pub auth: String,
}

impl From<PushKeysRequest> for PushKeys {
    fn from(req: PushKeysRequest) -> Self {
        Self {
            p256dh: req.p256dh,
            auth: req.auth,
        }
    }
}

/// Push unsubscription body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UnsubscribeRequest {
    /// Endpoint to remove.
    #[validate(length(min = 1, message = "is required"))]
    pub endpoint: String,
}

/// Query string for sighting search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SightingSearchQuery {
    /// Comma-separated lifecycle states.
    pub status: Option<String>,
    /// Comma-separated categories.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
    /// `lat,lng` to rank results by distance from.
    pub near: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

impl SightingSearchQuery {
    /// Parse into a filter and page request.
    pub fn into_parts(self) -> Result<(SightingFilter, PageRequest), AppError> {
        let filter = SightingFilter {
            statuses: parse_list("status", self.status.as_deref())?,
            categories: parse_list("category", self.category.as_deref())?,
            text: self
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            near: self.near.as_deref().map(parse_point).transpose()?,
        };
        let page = PageRequest::new(self.page.unwrap_or(1), self.page_size.unwrap_or(25));
        Ok((filter, page))
    }
}

/// Query string for the latest-sightings feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatestQuery {
    /// How many to return (default 3, max 20).
    pub limit: Option<u64>,
}

/// Parse `lat,lng` into a point.
fn parse_point(raw: &str) -> Result<GeoPoint, AppError> {
    let invalid = || AppError::invalid_field("near", "must be `lat,lng` in decimal degrees");
    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    GeoPoint::new(lat, lng).map_err(|e| AppError::invalid_field("near", e.to_string()))
}

fn parse_list<T>(field: &str, raw: Option<&str>) -> Result<Vec<T>, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(|e| AppError::invalid_field(field, e)))
        .collect()
}
