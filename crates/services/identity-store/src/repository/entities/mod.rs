//! SeaORM entity definitions
//!
//! One entity per table. These are storage shapes only; the stores convert
//! them to and from the `domain` types.

pub mod role;
pub mod user;
pub mod user_claim;
pub mod user_login;
pub mod user_role;
