//! Request handlers grouped by domain.

pub mod comment;
pub mod health;
pub mod notification;
pub mod push;
pub mod sighting;
pub mod user;
pub mod zone;
