//! Public comments on sightings.

pub mod service;

pub use service::{CommentDraft, CommentService};
