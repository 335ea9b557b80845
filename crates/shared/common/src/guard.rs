//! Argument guards.
//!
//! Every store operation checks its required arguments with these before
//! issuing a statement, so a bad call never reaches the backend.

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reject empty and whitespace-only strings.
pub fn require_text<'a>(name: &'static str, value: &'a str) -> AppResult<&'a str> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(name));
    }
    Ok(value)
}

/// Reject the nil UUID, which stands in for an absent key.
pub fn require_key(name: &'static str, id: Uuid) -> AppResult<Uuid> {
    if id.is_nil() {
        return Err(AppError::InvalidArgument(name));
    }
    Ok(id)
}
