//! Typed path parameter helpers.

use std::str::FromStr;

use taskhub_core::error::AppError;

/// Parses an id from a path segment.
///
/// A malformed id can never name a record the caller owns, so it reads as
/// not found rather than as a validation failure.
pub fn parse_id<T: FromStr>(raw: &str, not_found: &str) -> Result<T, AppError> {
    raw.parse().map_err(|_| AppError::not_found(not_found))
}
