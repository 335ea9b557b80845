//! Role membership for users.
//!
//! Memberships reference roles by id but callers address roles by name, so
//! reads and removals join `user_roles` with `roles`.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
    Set, TransactionTrait,
};

use super::entities::{role, user_role};
use super::UserStore;
use crate::query::{placeholder, Join, RelatedQuery, TableSpec};
use common::guard::{require_key, require_text};
use common::AppResult;
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Add the user to the named role. Unknown role names are ignored.
    async fn add_to_role(&self, user: &User, role_name: &str) -> AppResult<()>;

    /// Remove the user from the named role
    async fn remove_from_role(&self, user: &User, role_name: &str) -> AppResult<()>;

    /// Names of the user's roles, ordered by name
    async fn get_roles(&self, user: &User) -> AppResult<Vec<String>>;

    async fn is_in_role(&self, user: &User, role_name: &str) -> AppResult<bool>;
}

#[derive(Debug, FromQueryResult)]
struct RoleName {
    name: String,
}

/// roles ⟕ user_roles, projecting the role name.
fn role_names() -> AppResult<RelatedQuery<role::Entity, user_role::Entity>> {
    Ok(RelatedQuery::new(
        TableSpec::new(role::Entity, "r", role::Column::Id)?.columns([role::Column::Name]),
        TableSpec::new(user_role::Entity, "ur", user_role::Column::RoleId)?,
        Join::Left,
    ))
}

impl UserStore {
    /// `WHERE <ur>.user_id = <1>[ AND <r>.name = <2>]`
    fn membership_filter(
        &self,
        memberships: &TableSpec<user_role::Entity>,
        roles: Option<&TableSpec<role::Entity>>,
    ) -> String {
        let mut clause = format!(
            "WHERE {} = {}",
            memberships.qualify(user_role::Column::UserId),
            placeholder(self.backend(), 1)
        );
        if let Some(roles) = roles {
            clause.push_str(&format!(
                " AND {} = {}",
                roles.qualify(role::Column::Name),
                placeholder(self.backend(), 2)
            ));
        }
        clause
    }
}

#[async_trait]
impl UserRoleRepository for UserStore {
    async fn add_to_role(&self, user: &User, role_name: &str) -> AppResult<()> {
        let user_id = require_key("user", user.id)?;
        let name = require_text("roleName", role_name)?.to_owned();

        let added = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    // FOR SHARE holds off a concurrent role delete until commit
                    let Some(role) = role::Entity::find()
                        .filter(role::Column::Name.eq(name))
                        .lock_shared()
                        .one(txn)
                        .await?
                    else {
                        return Ok(false);
                    };

                    let membership = user_role::ActiveModel {
                        user_id: Set(user_id),
                        role_id: Set(role.id),
                    };
                    user_role::Entity::insert(membership)
                        .exec_without_returning(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await?;

        if !added {
            tracing::debug!(user_id = %user_id, role = %role_name, "Role not found, membership not added");
        }
        Ok(())
    }

    async fn remove_from_role(&self, user: &User, role_name: &str) -> AppResult<()> {
        let user_id = require_key("user", user.id)?;
        let name = require_text("roleName", role_name)?;

        let query = RelatedQuery::new(
            TableSpec::new(user_role::Entity, "ur", user_role::Column::RoleId)?,
            TableSpec::new(role::Entity, "r", role::Column::Id)?,
            Join::Inner,
        );
        let filter = self.membership_filter(query.primary(), Some(query.foreign()));
        let sql = query.delete(&filter)?;

        self.db
            .execute(self.statement(sql, [user_id.into(), name.into()]))
            .await?;
        Ok(())
    }

    async fn get_roles(&self, user: &User) -> AppResult<Vec<String>> {
        let user_id = require_key("user", user.id)?;

        let query = role_names()?;
        let order_by = format!("ORDER BY {}", query.primary().qualify(role::Column::Name));
        let filter = self.membership_filter(query.foreign(), None);
        let sql = query.select(&filter, Some(&order_by))?;

        let rows = RoleName::find_by_statement(self.statement(sql, [user_id.into()]))
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn is_in_role(&self, user: &User, role_name: &str) -> AppResult<bool> {
        let user_id = require_key("user", user.id)?;
        let name = require_text("roleName", role_name)?;

        let query = role_names()?;
        let filter = self.membership_filter(query.foreign(), Some(query.primary()));
        let sql = query.select(&filter, None)?;

        let found = RoleName::find_by_statement(self.statement(sql, [user_id.into(), name.into()]))
            .one(self.db.as_ref())
            .await?;
        Ok(found.is_some())
    }
}
