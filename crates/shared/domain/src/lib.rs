//! Domain layer - Identity entities and value objects.
//!
//! This crate contains the identity model shared by the stores and the
//! admin tooling. It has no knowledge of tables, SQL or connections.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod password;
pub mod role;
pub mod user;

pub use constants::*;
pub use credentials::{Claim, UserLoginInfo};
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use role::Role;
pub use user::User;
