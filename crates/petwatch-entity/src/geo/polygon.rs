//! Closed polygon rings and point containment.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, GeoPoint, GeometryError};

/// Distance (in degrees) within which a point counts as lying on an edge.
pub const EDGE_TOLERANCE: f64 = 1e-12;

/// A simple polygon stored as a closed ring: the first vertex is repeated
/// as the last one.
///
/// Longitude is treated as the x axis and latitude as the y axis. Rings
/// crossing the antimeridian are not supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>")]
pub struct Polygon {
    ring: Vec<GeoPoint>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Build a polygon from drawn vertices, closing the ring if needed.
    ///
    /// Fails when any vertex is out of range or when fewer than three
    /// distinct vertices remain.
    pub fn from_vertices(mut vertices: Vec<GeoPoint>) -> Result<Self, GeometryError> {
        for v in &vertices {
            v.validate()?;
        }

        let distinct = distinct_count(&vertices);
        if distinct < 3 {
            return Err(GeometryError::TooFewVertices(distinct));
        }

        if vertices.first() != vertices.last() {
            vertices.push(vertices[0]);
        }
        let bbox = BoundingBox::around(&vertices).ok_or(GeometryError::TooFewVertices(0))?;
        Ok(Self {
            ring: vertices,
            bbox,
        })
    }

    /// The closed ring, first == last.
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Vertices without the closing duplicate.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.ring[..self.ring.len() - 1]
    }

    /// Bounding box of the ring.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Whether `p` lies inside the polygon or on its boundary.
    ///
    /// Edges and vertices count as inside. The interior test is even-odd
    /// ray casting along +x.
    pub fn contains(&self, p: &GeoPoint) -> bool {
        if !self.bbox.contains(p) {
            return false;
        }

        let (x, y) = (p.lng, p.lat);
        let mut inside = false;
        for edge in self.ring.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            if on_segment(&a, &b, p) {
                return true;
            }
            if (a.lat > y) != (b.lat > y) {
                let x_cross = a.lng + (y - a.lat) * (b.lng - a.lng) / (b.lat - a.lat);
                if x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

impl TryFrom<Vec<GeoPoint>> for Polygon {
    type Error = GeometryError;

    fn try_from(vertices: Vec<GeoPoint>) -> Result<Self, Self::Error> {
        Self::from_vertices(vertices)
    }
}

impl From<Polygon> for Vec<GeoPoint> {
    fn from(p: Polygon) -> Self {
        p.ring
    }
}

fn distinct_count(points: &[GeoPoint]) -> usize {
    let mut seen: Vec<GeoPoint> = Vec::with_capacity(points.len());
    for p in points {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen.len()
}

fn on_segment(a: &GeoPoint, b: &GeoPoint, p: &GeoPoint) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    if cross.abs() > EDGE_TOLERANCE {
        return false;
    }
    p.lng >= a.lng.min(b.lng) - EDGE_TOLERANCE
        && p.lng <= a.lng.max(b.lng) + EDGE_TOLERANCE
        && p.lat >= a.lat.min(b.lat) - EDGE_TOLERANCE
        && p.lat <= a.lat.max(b.lat) + EDGE_TOLERANCE
}
