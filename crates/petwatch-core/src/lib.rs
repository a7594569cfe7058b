//! # petwatch-core
//!
//! Core crate for PetWatch. Contains configuration schemas, typed
//! identifiers, pagination types, the clock abstraction, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other PetWatch crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
