//! User domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::INITIAL_ACCESS_FAILED_COUNT;

/// A local user account and its security state.
///
/// Stores change a `User` field by field and persist each change
/// immediately. A change that fails to persist is not applied, so the
/// in-memory value always reflects the last successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub security_stamp: Option<String>,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    /// End of the current lockout, if any (always UTC)
    pub lockout_end_date_utc: Option<DateTime<Utc>>,
    pub access_failed_count: i32,
}

impl User {
    /// Create a user with a fresh identifier and every flag cleared.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            email: None,
            email_confirmed: false,
            phone_number: None,
            phone_number_confirmed: false,
            password_hash: None,
            security_stamp: None,
            two_factor_enabled: false,
            lockout_enabled: false,
            lockout_end_date_utc: None,
            access_failed_count: INITIAL_ACCESS_FAILED_COUNT,
        }
    }

    /// Set the email address, builder style.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Whether a non-empty password hash is held.
    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// Whether the user is locked out at `now`.
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end_date_utc.is_some_and(|end| end > now)
    }
}
