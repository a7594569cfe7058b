//! Contact details users share on their sightings.

pub mod input;
pub mod service;

pub use input::ProfilePatch;
pub use service::UserProfileService;
