//! Alert zone storage: create, list, and delete user polygons.

pub mod service;

pub use service::ZoneService;
