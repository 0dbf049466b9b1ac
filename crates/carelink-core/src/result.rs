//! Result type aliases for CareLink.

use crate::CarelinkError;

/// A specialized `Result` type for CareLink operations.
pub type CarelinkResult<T> = Result<T, CarelinkError>;
