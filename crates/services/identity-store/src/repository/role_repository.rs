//! Role store.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use common::guard::{require_key, require_text};
use common::{AppResult, DatabaseConfig};
use domain::Role;

use crate::infra::Database;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role persistence.
///
/// Lookups return `None` for missing rows. Names are treated as unique but
/// no uniqueness is enforced here.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Insert a new role
    async fn create(&self, role: &Role) -> AppResult<()>;

    /// Delete a role by its id
    async fn delete(&self, role: &Role) -> AppResult<()>;

    /// Find a role by id
    async fn find_by_id(&self, role_id: Uuid) -> AppResult<Option<Role>>;

    /// Find a role by exact name
    async fn find_by_name(&self, role_name: &str) -> AppResult<Option<Role>>;

    /// Write every field of the role
    async fn update(&self, role: &Role) -> AppResult<()>;

    /// All roles, ordered by name
    async fn list(&self) -> AppResult<Vec<Role>>;
}

/// SeaORM-backed role store.
pub struct RoleStore {
    db: Arc<DatabaseConnection>,
}

impl RoleStore {
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
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn create(&self, role: &Role) -> AppResult<()> {
        require_key("role", role.id)?;
        require_text("role.name", &role.name)?;

        RoleEntity::insert(ActiveModel::from(role))
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn delete(&self, role: &Role) -> AppResult<()> {
        let id = require_key("role", role.id)?;

        RoleEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_by_id(&self, role_id: Uuid) -> AppResult<Option<Role>> {
        let id = require_key("roleId", role_id)?;

        let result = RoleEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Role::from))
    }

    async fn find_by_name(&self, role_name: &str) -> AppResult<Option<Role>> {
        let name = require_text("roleName", role_name)?;

        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Role::from))
    }

    async fn update(&self, role: &Role) -> AppResult<()> {
        require_key("role", role.id)?;
        require_text("role.name", &role.name)?;

        ActiveModel::from(role).update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Name)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Role::from).collect())
    }
}
