//! Convenience result type alias for Playhub.

use crate::error::AppError;

/// A specialized `Result` type for Playhub operations.
pub type AppResult<T> = Result<T, AppError>;
