//! Typed sighting input and its validation.

use serde::{Deserialize, Serialize};

use petwatch_core::error::AppError;
use petwatch_entity::geo::GeoPoint;
use petwatch_entity::sighting::{CreateSighting, PetCategory, SightingStatus, UpdateSighting};

/// Longest description, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 2000;
/// Longest breed or color, in characters.
pub const SHORT_TEXT_MAX_LEN: usize = 100;
/// Longest photo URL, in characters.
pub const PHOTO_URL_MAX_LEN: usize = 2048;

/// A new sighting as submitted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingDraft {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
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
    /// Lifecycle state.
    pub status: SightingStatus,
}

/// An owner edit. Absent fields are left unchanged; latitude and longitude
/// must be given together. A blank `breed`, `color`, or `photo_url` clears
/// the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SightingPatch {
    /// New latitude.
    pub latitude: Option<f64>,
    /// New longitude.
    pub longitude: Option<f64>,
    /// New category.
    pub category: Option<PetCategory>,
    /// New breed.
    pub breed: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New photo URL.
    pub photo_url: Option<String>,
    /// New lifecycle state.
    pub status: Option<SightingStatus>,
}

impl SightingDraft {
    /// Check every field, naming the first offending one.
    pub fn validate(self) -> Result<CreateSighting, AppError> {
        Ok(CreateSighting {
            location: location(self.latitude, self.longitude)?,
            category: self.category,
            breed: short_text("breed", self.breed)?,
            color: short_text("color", self.color)?,
            description: description(self.description)?,
            photo_url: photo_url(self.photo_url)?,
            status: self.status,
        })
    }
}

impl SightingPatch {
    /// Check the given fields, naming the first offending one.
    pub fn validate(self) -> Result<UpdateSighting, AppError> {
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(location(lat, lng)?),
            (None, None) => None,
            (Some(_), None) => {
                return Err(AppError::invalid_field("longitude", "required with latitude"));
            }
            (None, Some(_)) => {
                return Err(AppError::invalid_field("latitude", "required with longitude"));
            }
        };
        Ok(UpdateSighting {
            location,
            category: self.category,
            breed: cleared_or(self.breed, |t| short_text("breed", Some(t)))?,
            color: cleared_or(self.color, |t| short_text("color", Some(t)))?,
            description: self.description.map(description).transpose()?,
            photo_url: cleared_or(self.photo_url, |u| photo_url(Some(u)))?,
            status: self.status,
        })
    }
}

fn location(lat: f64, lng: f64) -> Result<GeoPoint, AppError> {
    GeoPoint::new(lat, lng).map_err(|e| AppError::invalid_field(e.field(), e.to_string()))
}

fn description(text: String) -> Result<String, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::invalid_field("description", "must not be empty"));
    }
    if text.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(AppError::invalid_field(
            "description",
            format!("must be at most {DESCRIPTION_MAX_LEN} characters"),
        ));
    }
    Ok(text.to_string())
}

/// Tri-state edit of an optional field: absent stays `None`, blank becomes
/// `Some(None)`, anything else goes through `check`.
fn cleared_or<F>(value: Option<String>, check: F) -> Result<Option<Option<String>>, AppError>
where
    F: FnOnce(String) -> Result<Option<String>, AppError>,
{
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(Some(None)),
        Some(v) => check(v).map(Some),
    }
}

/// Blank optional text collapses to `None`.
fn short_text(field: &str, text: Option<String>) -> Result<Option<String>, AppError> {
    let Some(text) = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > SHORT_TEXT_MAX_LEN {
        return Err(AppError::invalid_field(
            field,
            format!("must be at most {SHORT_TEXT_MAX_LEN} characters"),
        ));
    }
    Ok(Some(text))
}

fn photo_url(url: Option<String>) -> Result<Option<String>, AppError> {
    let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(AppError::invalid_field("photo_url", "must be an http(s) URL"));
    }
    if url.len() > PHOTO_URL_MAX_LEN {
        return Err(AppError::invalid_field("photo_url", "is too long"));
    }
    Ok(Some(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SightingDraft {
        SightingDraft {
            latitude: -34.6,
            longitude: -58.38,
            category: PetCategory::Dog,
            breed: Some("  ".to_string()),
            color: Some("brown".to_string()),
            description: "  Small dog near the park ".to_string(),
            photo_url: None,
            status: SightingStatus::Lost,
        }
    }

    #[test]
    fn test_valid_draft_is_normalized() {
        let c = draft().validate().expect("valid");
        assert_eq!(c.description, "Small dog near the park");
        assert_eq!(c.breed, None);
        assert_eq!(c.color.as_deref(), Some("brown"));
    }

    #[test]
    fn test_invalid_fields_are_named() {
        let mut d = draft();
        d.latitude = 123.0;
        assert_eq!(d.validate().unwrap_err().field.as_deref(), Some("latitude"));

        let mut d = draft();
        d.longitude = f64::NAN;
        assert_eq!(d.validate().unwrap_err().field.as_deref(), Some("longitude"));

        let mut d = draft();
        d.description = "   ".to_string();
        assert_eq!(d.validate().unwrap_err().field.as_deref(), Some("description"));

        let mut d = draft();
        d.photo_url = Some("ftp://x".to_string());
        assert_eq!(d.validate().unwrap_err().field.as_deref(), Some("photo_url"));

        let mut d = draft();
        d.color = Some("x".repeat(101));
        assert_eq!(d.validate().unwrap_err().field.as_deref(), Some("color"));
    }

    #[test]
    fn test_patch_requires_both_coordinates() {
        let patch = SightingPatch {
            latitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err().field.as_deref(), Some("longitude"));
    }

    #[test]
    fn test_patch_blank_text_clears_and_absent_keeps() {
        let update = SightingPatch {
            breed: Some(" ".to_string()),
            photo_url: Some(String::new()),
            color: Some(" tan ".to_string()),
            ..Default::default()
        }
        .validate()
        .expect("valid");
        assert_eq!(update.breed, Some(None));
        assert_eq!(update.photo_url, Some(None));
        assert_eq!(update.color, Some(Some("tan".to_string())));
        assert_eq!(update.description, None);

        let err = SightingPatch {
            photo_url: Some("not a url".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("photo_url"));
    }
}
