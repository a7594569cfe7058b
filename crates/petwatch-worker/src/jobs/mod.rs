//! Built-in job handler implementations.

pub mod cleanup;
pub mod push_delivery;
pub mod sighting_match;

pub use cleanup::JobCleanupHandler;
pub use push_delivery::PushDeliveryJobHandler;
pub use sighting_match::SightingMatchJobHandler;
