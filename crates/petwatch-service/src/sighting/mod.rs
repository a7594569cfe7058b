//! Sighting ingest: validated, rate-limited submission plus owner edits
//! and public listings.

pub mod input;
pub mod service;

pub use input::{SightingDraft, SightingPatch};
pub use service::SightingService;
