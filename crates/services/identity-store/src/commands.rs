//! Admin command handlers.
//!
//! Each handler works against the store traits, so the binary passes the
//! real stores and tests pass mocks. Handlers are stricter than the stores:
//! unknown names are reported as `NotFound` and duplicate names as `Conflict`.

use chrono::Utc;
use serde::Serialize;

use common::{AppError, AppResult, OptionExt};
use domain::{Password, Role, User};

use crate::repository::{RoleRepository, UserRepository, UserRoleRepository};

pub async fn create_role(roles: &dyn RoleRepository, name: &str) -> AppResult<Role> {
    if roles.find_by_name(name).await?.is_some() {
        return Err(AppError::conflict(format!("Role '{}'", name)));
    }

    let role = Role::new(name);
    roles.create(&role).await?;
    tracing::info!(role_id = %role.id, name = %role.name, "Role created");
    Ok(role)
}

pub async fn delete_role(roles: &dyn RoleRepository, name: &str) -> AppResult<()> {
    let role = roles.find_by_name(name).await?.ok_or_not_found()?;

    roles.delete(&role).await?;
    tracing::info!(role_id = %role.id, name = %role.name, "Role deleted");
    Ok(())
}

pub async fn list_roles(roles: &dyn RoleRepository) -> AppResult<Vec<Role>> {
    roles.list().await
}

/// Create a user, hashing `password` with argon2 when given.
pub async fn create_user(
    users: &dyn UserRepository,
    user_name: &str,
    email: Option<&str>,
    password: Option<&str>,
) -> AppResult<User> {
    if users.find_by_name(user_name).await?.is_some() {
        return Err(AppError::conflict(format!("User '{}'", user_name)));
    }

    let mut user = User::new(user_name);
    user.email = email.map(str::to_owned);
    if let Some(password) = password {
        user.password_hash = Some(Password::new(password)?.into());
    }

    users.create(&user).await?;
    tracing::info!(user_id = %user.id, user_name = %user.user_name, "User created");
    Ok(user)
}

/// A user as printed by `user show`.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    /// Whether a lockout is in force right now
    pub locked_out: bool,
}

pub async fn show_user(users: &dyn UserRepository, user_name: &str) -> AppResult<UserDetails> {
    let user = users.find_by_name(user_name).await?.ok_or_not_found()?;
    let locked_out = user.is_locked_out(Utc::now());

    Ok(UserDetails { user, locked_out })
}

/// Add the user to an existing role.
pub async fn grant_role(
    users: &dyn UserRepository,
    roles: &dyn RoleRepository,
    memberships: &dyn UserRoleRepository,
    user_name: &str,
    role_name: &str,
) -> AppResult<()> {
    let user = users.find_by_name(user_name).await?.ok_or_not_found()?;
    roles.find_by_name(role_name).await?.ok_or_not_found()?;

    memberships.add_to_role(&user, role_name).await
}

pub async fn revoke_role(
    users: &dyn UserRepository,
    memberships: &dyn UserRoleRepository,
    user_name: &str,
    role_name: &str,
) -> AppResult<()> {
    let user = users.find_by_name(user_name).await?.ok_or_not_found()?;

    memberships.remove_from_role(&user, role_name).await
}

pub async fn user_roles(
    users: &dyn UserRepository,
    memberships: &dyn UserRoleRepository,
    user_name: &str,
) -> AppResult<Vec<String>> {
    let user = users.find_by_name(user_name).await?.ok_or_not_found()?;

    memberships.get_roles(&user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::repository::{MockRoleRepository, MockUserRepository, MockUserRoleRepository};

    #[tokio::test]
    async fn test_create_role_rejects_duplicate_name() {
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_name()
            .withf(|name| name == "admin")
            .returning(|name| Ok(Some(Role::new(name))));
        roles.expect_create().never();

        let err = create_role(&roles, "admin").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_role_inserts_new_role() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(None));
        roles
            .expect_create()
            .withf(|role| role.name == "editor" && !role.id.is_nil())
            .times(1)
            .returning(|_| Ok(()));

        let role = create_role(&roles, "editor").await.unwrap();

        assert_eq!(role.name, "editor");
    }

    #[tokio::test]
    async fn test_delete_unknown_role_is_not_found() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(None));
        roles.expect_delete().never();

        let err = delete_role(&roles, "ghost").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| {
                user.user_name == "alice"
                    && user.email.as_deref() == Some("alice@example.com")
                    && user
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| Password::from_hash(h).verify("correct horse"))
            })
            .times(1)
            .returning(|_| Ok(()));

        let user = create_user(&users, "alice", Some("alice@example.com"), Some("correct horse"))
            .await
            .unwrap();

        assert!(user.has_password());
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|_| Ok(None));
        users.expect_create().never();

        let err = create_user(&users, "alice", None, Some("short")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_grant_role_requires_existing_role() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|name| Ok(Some(User::new(name))));
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(None));
        let mut memberships = MockUserRoleRepository::new();
        memberships.expect_add_to_role().never();

        let err = grant_role(&users, &roles, &memberships, "alice", "admin")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_grant_role_adds_membership() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|name| Ok(Some(User::new(name))));
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_name()
            .returning(|name| Ok(Some(Role::new(name))));
        let mut memberships = MockUserRoleRepository::new();
        memberships
            .expect_add_to_role()
            .withf(|user, role| user.user_name == "alice" && role == "admin")
            .times(1)
            .returning(|_, _| Ok(()));

        grant_role(&users, &roles, &memberships, "alice", "admin")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_user_roles_lists_memberships() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|name| Ok(Some(User::new(name))));
        let mut memberships = MockUserRoleRepository::new();
        memberships
            .expect_get_roles()
            .returning(|_| Ok(vec!["admin".to_string(), "editor".to_string()]));

        let names = user_roles(&users, &memberships, "alice").await.unwrap();

        assert_eq!(names, vec!["admin", "editor"]);
    }

    #[tokio::test]
    async fn test_show_user_reports_active_lockout() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|name| {
            let mut user = User::new(name);
            user.lockout_enabled = true;
            user.lockout_end_date_utc = Some(Utc::now() + Duration::hours(1));
            Ok(Some(user))
        });

        let details = show_user(&users, "alice").await.unwrap();

        assert!(details.locked_out);
        assert_eq!(details.user.user_name, "alice");
    }

    #[tokio::test]
    async fn test_show_user_expired_lockout_is_not_locked() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|name| {
            let mut user = User::new(name);
            user.lockout_enabled = true;
            user.lockout_end_date_utc = Some(Utc::now() - Duration::minutes(5));
            Ok(Some(user))
        });

        let details = show_user(&users, "alice").await.unwrap();

        assert!(!details.locked_out);
    }
}
