//! Domain-level constants.

// =============================================================================
// Passwords
// =============================================================================

/// Minimum plain-text password length accepted by [`crate::Password::new`]
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Lockout
// =============================================================================

/// Value of a freshly created user's failed access counter
pub const INITIAL_ACCESS_FAILED_COUNT: i32 = 0;

