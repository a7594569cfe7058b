//! Alert zone domain entities.

pub mod model;

pub use model::{AlertZone, ZoneMatch, ZONE_NAME_MAX_LEN};
