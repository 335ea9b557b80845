//! Identity Store Library
//!
//! Relational persistence for an identity system: users, roles, role
//! memberships, claims and external logins, stored through SeaORM on
//! PostgreSQL or SQLite.
//!
//! [`RoleStore`] and [`UserStore`] are the entry points. The user store
//! surface is split into capability traits (`UserLoginRepository`,
//! `UserLockoutRepository`, ...) that [`UserStore`] implements together.

pub mod commands;
pub mod config;
pub mod infra;
pub mod query;
pub mod repository;

pub use config::IdentityStoreConfig;
pub use infra::Database;
pub use repository::{IdentityUserStore, RoleStore, UserStore};

use tracing::info;

/// Connect with configuration from the environment and create missing tables.
pub async fn init_schema() -> Result<(), Box<dyn std::error::Error>> {
    let config = IdentityStoreConfig::from_env();
    let db = Database::connect(&config.database).await?;

    db.ping().await?;
    db.create_schema().await?;
    info!("Identity tables created");

    Ok(())
}
