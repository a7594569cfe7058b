//! Point-in-polygon matching of sightings against alert zones.

mod matcher;

pub use matcher::ZoneMatcher;
