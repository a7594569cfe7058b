//! A WGS84 latitude/longitude pair.

use serde::{Deserialize, Serialize};

use super::GeometryError;

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, -90..=90.
    pub lat: f64,
    /// Longitude, -180..=180.
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeometryError> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    /// Check the coordinate ranges.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeometryError::Latitude(self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeometryError::Longitude(self.lng));
        }
        Ok(())
    }
}

impl GeoPoint {
    /// Squared equirectangular distance to `other`, in degrees of latitude.
    ///
    /// Only good for ranking nearby points; longitude is scaled by the
    /// cosine of this point's latitude.
    pub fn distance_rank(&self, other: &GeoPoint) -> f64 {
        let dlat = other.lat - self.lat;
        let dlng = (other.lng - self.lng) * self.lat.to_radians().cos();
        dlat * dlat + dlng * dlng
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lat, p.lng]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_checks() {
        assert!(GeoPoint::new(-34.6, -58.38).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert_eq!(
            GeoPoint::new(91.0, 0.0).unwrap_err(),
            GeometryError::Latitude(91.0)
        );
        assert!(matches!(
            GeoPoint::new(0.0, -180.5),
            Err(GeometryError::Longitude(_))
        ));
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distance_rank_orders_by_proximity() {
        let origin = GeoPoint { lat: 60.0, lng: 10.0 };
        let north = GeoPoint { lat: 60.5, lng: 10.0 };
        // Half a degree of longitude at 60N is about a quarter degree of latitude.
        let east = GeoPoint { lat: 60.0, lng: 10.5 };
        assert!(origin.distance_rank(&east) < origin.distance_rank(&north));
        assert_eq!(origin.distance_rank(&origin), 0.0);
    }
}
