//! Password, security stamp, two-factor and lockout state.
//!
//! Setters write the whole row and update the passed `User` once stored. Getters
//! read the in-memory value, except the password ones, which re-read the
//! stored row.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};

use super::UserStore;
use common::guard::require_key;
use common::AppResult;
use domain::User;

#[async_trait]
pub trait UserPasswordRepository: Send + Sync {
    /// Store a password hash for the user
    async fn set_password_hash(&self, user: &mut User, password_hash: &str) -> AppResult<()>;

    /// The hash currently stored for the user
    async fn get_password_hash(&self, user: &User) -> AppResult<Option<String>>;

    /// Whether a non-empty hash is stored for the user
    async fn has_password(&self, user: &User) -> AppResult<bool>;
}

#[async_trait]
pub trait UserSecurityStampRepository: Send + Sync {
    async fn set_security_stamp(&self, user: &mut User, stamp: &str) -> AppResult<()>;

    async fn get_security_stamp(&self, user: &User) -> AppResult<Option<String>>;
}

#[async_trait]
pub trait UserTwoFactorRepository: Send + Sync {
    async fn set_two_factor_enabled(&self, user: &mut User, enabled: bool) -> AppResult<()>;

    async fn get_two_factor_enabled(&self, user: &User) -> AppResult<bool>;
}

/// Lockout end date and failed-access counter.
#[async_trait]
pub trait UserLockoutRepository: Send + Sync {
    /// End of the lockout in UTC, or the Unix epoch when none is set
    async fn get_lockout_end_date(&self, user: &User) -> AppResult<DateTime<FixedOffset>>;

    /// Set the lockout end, stored as UTC. `None` clears it.
    async fn set_lockout_end_date(
        &self,
        user: &mut User,
        lockout_end: Option<DateTime<FixedOffset>>,
    ) -> AppResult<()>;

    /// Bump the failed-access counter and return the new value
    async fn increment_access_failed_count(&self, user: &mut User) -> AppResult<i32>;

    async fn reset_access_failed_count(&self, user: &mut User) -> AppResult<()>;

    async fn get_access_failed_count(&self, user: &User) -> AppResult<i32>;

    async fn get_lockout_enabled(&self, user: &User) -> AppResult<bool>;

    async fn set_lockout_enabled(&self, user: &mut User, enabled: bool) -> AppResult<()>;
}

#[async_trait]
impl UserPasswordRepository for UserStore {
    async fn set_password_hash(&self, user: &mut User, password_hash: &str) -> AppResult<()> {
        self.persist_with(user, |u| u.password_hash = Some(password_hash.to_owned())).await
    }

    async fn get_password_hash(&self, user: &User) -> AppResult<Option<String>> {
        let stored = self.reload(user).await?;
        Ok(stored.password_hash)
    }

    async fn has_password(&self, user: &User) -> AppResult<bool> {
        let stored = self.reload(user).await?;
        Ok(stored.has_password())
    }
}

#[async_trait]
impl UserSecurityStampRepository for UserStore {
    async fn set_security_stamp(&self, user: &mut User, stamp: &str) -> AppResult<()> {
        self.persist_with(user, |u| u.security_stamp = Some(stamp.to_owned())).await
    }

    async fn get_security_stamp(&self, user: &User) -> AppResult<Option<String>> {
        require_key("user", user.id)?;
        Ok(user.security_stamp.clone())
    }
}

#[async_trait]
impl UserTwoFactorRepository for UserStore {
    async fn set_two_factor_enabled(&self, user: &mut User, enabled: bool) -> AppResult<()> {
        self.persist_with(user, |u| u.two_factor_enabled = enabled).await
    }

    async fn get_two_factor_enabled(&self, user: &User) -> AppResult<bool> {
        require_key("user", user.id)?;
        Ok(user.two_factor_enabled)
    }
}

#[async_trait]
impl UserLockoutRepository for UserStore {
    async fn get_lockout_end_date(&self, user: &User) -> AppResult<DateTime<FixedOffset>> {
        require_key("user", user.id)?;

        let end = user.lockout_end_date_utc.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Ok(end.fixed_offset())
    }

    async fn set_lockout_end_date(
        &self,
        user: &mut User,
        lockout_end: Option<DateTime<FixedOffset>>,
    ) -> AppResult<()> {
        let end_utc = lockout_end.map(|end| end.with_timezone(&Utc));
        self.persist_with(user, |u| u.lockout_end_date_utc = end_utc).await
    }

    async fn increment_access_failed_count(&self, user: &mut User) -> AppResult<i32> {
        self.persist_with(user, |u| u.access_failed_count += 1).await?;
        Ok(user.access_failed_count)
    }

    async fn reset_access_failed_count(&self, user: &mut User) -> AppResult<()> {
        self.persist_with(user, |u| u.access_failed_count = 0).await
    }

    async fn get_access_failed_count(&self, user: &User) -> AppResult<i32> {
        require_key("user", user.id)?;
        Ok(user.access_failed_count)
    }

    async fn get_lockout_enabled(&self, user: &User) -> AppResult<bool> {
        require_key("user", user.id)?;
        Ok(user.lockout_enabled)
    }

    async fn set_lockout_enabled(&self, user: &mut User, enabled: bool) -> AppResult<()> {
        self.persist_with(user, |u| u.lockout_enabled = enabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::transaction_log;
    use crate::repository::entities::user;
    use common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    fn row(user: &User) -> user::Model {
        user::Model {
            id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            email_confirmed: user.email_confirmed,
            phone_number: user.phone_number.clone(),
            phone_number_confirmed: user.phone_number_confirmed,
            password_hash: user.password_hash.clone(),
            security_stamp: user.security_stamp.clone(),
            two_factor_enabled: user.two_factor_enabled,
            lockout_enabled: user.lockout_enabled,
            lockout_end_date_utc: user.lockout_end_date_utc,
            access_failed_count: user.access_failed_count,
        }
    }

    #[tokio::test]
    async fn test_unset_lockout_end_is_epoch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = UserStore::new(db);

        let end = store.get_lockout_end_date(&User::new("alice")).await.unwrap();

        assert_eq!(end.timestamp(), 0);
        assert_eq!(end.offset().local_minus_utc(), 0);
        assert!(transaction_log(store.into_connection()).is_empty());
    }

    #[tokio::test]
    async fn test_increment_persists_new_count() {
        let mut user = User::new("alice");
        let mut updated = user.clone();
        updated.access_failed_count = 1;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&updated)]])
            .into_connection();
        let store = UserStore::new(db);

        let count = store.increment_access_failed_count(&mut user).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(user.access_failed_count, 1);
        assert_eq!(transaction_log(store.into_connection()).len(), 1);
    }

    #[tokio::test]
    async fn test_has_password_rereads_row() {
        let mut stored = User::new("alice");
        stored.password_hash = Some("$argon2id$stored".to_string());
        let in_memory = User {
            password_hash: None,
            ..stored.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&stored)]])
            .into_connection();
        let store = UserStore::new(db);

        assert!(store.has_password(&in_memory).await.unwrap());
    }

    #[tokio::test]
    async fn test_password_hash_of_missing_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let store = UserStore::new(db);

        let err = store
            .get_password_hash(&User::new("ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_setters_reject_nil_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = UserStore::new(db);
        let mut user = User::new("alice");
        user.id = Uuid::nil();

        assert!(store.set_password_hash(&mut user, "hash").await.is_err());
        assert!(store.set_security_stamp(&mut user, "stamp").await.is_err());
        assert!(store.set_lockout_enabled(&mut user, true).await.is_err());
        assert!(store.has_password(&user).await.is_err());
        assert_eq!(user.password_hash, None);
        assert!(transaction_log(store.into_connection()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_user_unchanged() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new(), Vec::<user::Model>::new()])
            .into_connection();
        let store = UserStore::new(db);
        let mut user = User::new("alice");
        let before = user.clone();

        assert!(store.increment_access_failed_count(&mut user).await.is_err());
        assert!(store.set_security_stamp(&mut user, "stamp-2").await.is_err());

        assert_eq!(user, before);
    }
}
