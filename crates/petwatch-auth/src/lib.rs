//! # petwatch-auth
//!
//! Verification of bearer tokens issued by the external auth provider.
//! PetWatch never issues or refreshes tokens itself; it only resolves the
//! caller's user id from a valid token.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder};
