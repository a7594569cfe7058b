//! Axis-aligned bounding boxes used to prefilter candidate zones.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// The smallest lat/lng rectangle enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl BoundingBox {
    /// Compute the box around `points`. Returns `None` for an empty slice.
    pub fn around(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lng: b.min_lng.min(p.lng),
            max_lng: b.max_lng.max(p.lng),
        }))
    }

    /// Inclusive containment check.
    pub fn contains(&self, p: &GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lng >= self.min_lng && p.lng <= self.max_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_and_contains() {
        let pts = [
            GeoPoint { lat: 1.0, lng: 5.0 },
            GeoPoint { lat: -2.0, lng: 7.0 },
            GeoPoint { lat: 0.0, lng: 6.0 },
        ];
        let b = BoundingBox::around(&pts).expect("non-empty");
        assert_eq!((b.min_lat, b.max_lat, b.min_lng, b.max_lng), (-2.0, 1.0, 5.0, 7.0));
        assert!(b.contains(&GeoPoint { lat: 1.0, lng: 7.0 }));
        assert!(!b.contains(&GeoPoint { lat: 1.1, lng: 6.0 }));
        assert!(BoundingBox::around(&[]).is_none());
    }
}
