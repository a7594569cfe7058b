//! Sighting domain entities.

pub mod category;
pub mod details;
pub mod model;
pub mod status;

pub use category::PetCategory;
pub use details::SightingDetails;
pub use model::{CreateSighting, Sighting, SightingFilter, UpdateSighting, SIGHTING_VALIDITY_HOURS};
pub use status::SightingStatus;
