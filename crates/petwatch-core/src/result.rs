//! Convenience result type alias for PetWatch.

use crate::error::AppError;

/// A specialized `Result` type for PetWatch operations.
pub type AppResult<T> = Result<T, AppError>;
