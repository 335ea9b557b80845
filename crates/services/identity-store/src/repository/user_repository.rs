//! User store: CRUD and the shared plumbing for the capability traits.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement, Value,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::{
    UserClaimRepository, UserEmailRepository, UserLockoutRepository, UserLoginRepository,
    UserPasswordRepository, UserPhoneNumberRepository, UserRoleRepository,
    UserSecurityStampRepository, UserTwoFactorRepository,
};
use common::guard::{require_key, require_text};
use common::{AppResult, DatabaseConfig, OptionExt};
use domain::User;

use crate::infra::Database;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User CRUD.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User) -> AppResult<()>;

    /// Delete a user by id. Logins, claims and memberships are left alone.
    async fn delete(&self, user: &User) -> AppResult<()>;

    /// Find a user by id
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by exact user name
    async fn find_by_name(&self, user_name: &str) -> AppResult<Option<User>>;

    /// Write every field of the user
    async fn update(&self, user: &User) -> AppResult<()>;
}

/// Every user capability at once.
pub trait IdentityUserStore:
    UserRepository
    + UserLoginRepository
    + UserClaimRepository
    + UserRoleRepository
    + UserPasswordRepository
    + UserSecurityStampRepository
    + UserEmailRepository
    + UserPhoneNumberRepository
    + UserTwoFactorRepository
    + UserLockoutRepository
{
}

impl<T> IdentityUserStore for T where
    T: UserRepository
        + UserLoginRepository
        + UserClaimRepository
        + UserRoleRepository
        + UserPasswordRepository
        + UserSecurityStampRepository
        + UserEmailRepository
        + UserPhoneNumberRepository
        + UserTwoFactorRepository
        + UserLockoutRepository
{
}

/// SeaORM-backed user store.
///
/// Implements every user capability trait. Setters on the capability traits
/// write the whole row straight away and update the passed `User` only when
/// that write succeeds.
pub struct UserStore {
    pub(super) db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create a store over an existing connection, or a handle shared
    /// with other stores
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Open a connection from configuration and wrap it
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let db = Database::connect(config).await?;
        Ok(Self::new(db.into_connection()))
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Give up the store and hand back its connection handle
    pub fn into_connection(self) -> Arc<DatabaseConnection> {
        self.db
    }

    /// Release the connection handle. The pool is closed once no other
    /// store shares it.
    pub async fn close(self) -> AppResult<()> {
        if let Ok(db) = Arc::try_unwrap(self.db) {
            db.close().await?;
        }
        Ok(())
    }

    pub(super) fn backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    /// Bind `values` to hand-built SQL for this connection's backend.
    pub(super) fn statement<I>(&self, sql: String, values: I) -> Statement
    where
        I: IntoIterator<Item = Value>,
    {
        Statement::from_sql_and_values(self.backend(), sql, values)
    }

    /// Write the full row for `user`.
    pub(super) async fn persist(&self, user: &User) -> AppResult<()> {
        ActiveModel::from(user).update(self.db.as_ref()).await?;
        Ok(())
    }

    /// Apply `change` to a copy of `user` and write it. `user` only takes
    /// the change once the row is stored.
    pub(super) async fn persist_with<F>(&self, user: &mut User, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut User) + Send,
    {
        require_key("user", user.id)?;

        let mut updated = user.clone();
        change(&mut updated);
        self.persist(&updated).await?;

        *user = updated;
        Ok(())
    }

    /// Re-read the stored row for `user`; it must still exist.
    pub(super) async fn reload(&self, user: &User) -> AppResult<User> {
        let id = require_key("user", user.id)?;

        let model = UserEntity::find_by_id(id).one(self.db.as_ref()).await?.ok_or_not_found()?;
        Ok(User::from(model))
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: &User) -> AppResult<()> {
        require_key("user", user.id)?;
        require_text("user.user_name", &user.user_name)?;

        UserEntity::insert(ActiveModel::from(user))
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        let id = require_key("user", user.id)?;

        UserEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let id = require_key("userId", user_id)?;

        let result = UserEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let name = require_text("userName", user_name)?;

        let result = UserEntity::find()
            .filter(user::Column::UserName.eq(name))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(User::from))
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        require_key("user", user.id)?;
        require_text("user.user_name", &user.user_name)?;

        self.persist(user).await
    }
}
