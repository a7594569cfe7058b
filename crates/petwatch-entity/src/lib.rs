//! # petwatch-entity
//!
//! Domain entity models for PetWatch. Every struct in this crate represents
//! a database table row or a domain value object. Row entities additionally
//! derive `sqlx::FromRow`.

pub mod comment;
pub mod geo;
pub mod job;
pub mod notification;
pub mod push;
pub mod sighting;
pub mod user;
pub mod zone;
