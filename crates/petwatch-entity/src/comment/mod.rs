//! Comments left on sightings.

pub mod model;

pub use model::{Comment, CommentDetails};
