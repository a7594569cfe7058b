//! # petwatch-api
//!
//! HTTP API layer for PetWatch built on Axum.
//!
//! Provides the REST endpoints for sightings, alert zones, the notification
//! inbox and push subscriptions, plus middleware (CORS, request logging),
//! extractors (bearer auth, validated JSON, pagination), DTOs, and error
//! mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
