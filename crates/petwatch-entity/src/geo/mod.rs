//! Geographic value objects: points, bounding boxes, and closed polygons.

pub mod bbox;
pub mod point;
pub mod polygon;

pub use bbox::BoundingBox;
pub use point::GeoPoint;
pub use polygon::Polygon;

use thiserror::Error;

/// Reasons a coordinate or polygon is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("latitude {0} must be a finite value between -90 and 90")]
    Latitude(f64),
    /// Longitude outside [-180, 180] or not finite.
    #[error("longitude {0} must be a finite value between -180 and 180")]
    Longitude(f64),
    /// Fewer than three distinct vertices.
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),
}

impl GeometryError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Latitude(_) => "latitude",
            Self::Longitude(_) => "longitude",
            Self::TooFewVertices(_) => "polygon",
        }
    }
}
