//! Password value object.
//!
//! The stores only ever persist hashes. This type is how callers turn a
//! plain-text secret into the hash handed to `set_password_hash`, and how a
//! stored hash is checked later.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// An argon2 (PHC string) password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password with a fresh random salt.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`].
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("hashing failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash previously read from the password store.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// The PHC-formatted hash, as persisted.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Check a plain-text candidate against this hash.
    ///
    /// A hash that cannot be parsed never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("Secret Squirrel!").unwrap();

        assert!(password.verify("Secret Squirrel!"));
        assert!(!password.verify("secret squirrel!"));
    }

    #[test]
    fn test_restored_hash_verifies() {
        let hash: String = Password::new("correct horse").unwrap().into();

        assert!(Password::from_hash(hash).verify("correct horse"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = Password::new("SamePassword123").unwrap();
        let b = Password::new("SamePassword123").unwrap();

        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_password_too_short() {
        let result = Password::new("short");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-phc-string").verify("anything"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("Password123!").unwrap();
        let debug = format!("{:?}", password);

        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(password.as_str()));
    }
}
