//! Repository layer for data access.
//!
//! `RoleStore` and `UserStore` are the two concrete stores. The user store's
//! surface is split into one trait per capability so callers can depend on
//! just the slice they use.

pub mod entities;
mod role_repository;
mod user_claims;
mod user_contact;
mod user_logins;
mod user_repository;
mod user_roles;
mod user_security;

pub use role_repository::{RoleRepository, RoleStore};
pub use user_claims::UserClaimRepository;
pub use user_contact::{UserEmailRepository, UserPhoneNumberRepository};
pub use user_logins::UserLoginRepository;
pub use user_repository::{IdentityUserStore, UserRepository, UserStore};
pub use user_roles::UserRoleRepository;
pub use user_security::{
    UserLockoutRepository, UserPasswordRepository, UserSecurityStampRepository,
    UserTwoFactorRepository,
};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_roles::MockUserRoleRepository;
