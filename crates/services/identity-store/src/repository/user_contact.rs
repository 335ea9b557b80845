//! Email and phone number, with their confirmation flags.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::entities::user;
use super::UserStore;
use common::guard::{require_key, require_text};
use common::AppResult;
use domain::User;

#[async_trait]
pub trait UserEmailRepository: Send + Sync {
    async fn set_email(&self, user: &mut User, email: Option<&str>) -> AppResult<()>;

    async fn get_email(&self, user: &User) -> AppResult<Option<String>>;

    async fn get_email_confirmed(&self, user: &User) -> AppResult<bool>;

    async fn set_email_confirmed(&self, user: &mut User, confirmed: bool) -> AppResult<()>;

    /// Find a user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait UserPhoneNumberRepository: Send + Sync {
    async fn set_phone_number(&self, user: &mut User, phone_number: Option<&str>) -> AppResult<()>;

    async fn get_phone_number(&self, user: &User) -> AppResult<Option<String>>;

    async fn get_phone_number_confirmed(&self, user: &User) -> AppResult<bool>;

    async fn set_phone_number_confirmed(&self, user: &mut User, confirmed: bool) -> AppResult<()>;
}

#[async_trait]
impl UserEmailRepository for UserStore {
    async fn set_email(&self, user: &mut User, email: Option<&str>) -> AppResult<()> {
        self.persist_with(user, |u| u.email = email.map(str::to_owned)).await
    }

    async fn get_email(&self, user: &User) -> AppResult<Option<String>> {
        require_key("user", user.id)?;
        Ok(user.email.clone())
    }

    async fn get_email_confirmed(&self, user: &User) -> AppResult<bool> {
        require_key("user", user.id)?;
        Ok(user.email_confirmed)
    }

    async fn set_email_confirmed(&self, user: &mut User, confirmed: bool) -> AppResult<()> {
        self.persist_with(user, |u| u.email_confirmed = confirmed).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = require_text("email", email)?;

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(User::from))
    }
}

#[async_trait]
impl UserPhoneNumberRepository for UserStore {
    async fn set_phone_number(&self, user: &mut User, phone_number: Option<&str>) -> AppResult<()> {
        self.persist_with(user, |u| u.phone_number = phone_number.map(str::to_owned)).await
    }

    async fn get_phone_number(&self, user: &User) -> AppResult<Option<String>> {
        require_key("user", user.id)?;
        Ok(user.phone_number.clone())
    }

    async fn get_phone_number_confirmed(&self, user: &User) -> AppResult<bool> {
        require_key("user", user.id)?;
        Ok(user.phone_number_confirmed)
    }

    async fn set_phone_number_confirmed(&self, user: &mut User, confirmed: bool) -> AppResult<()> {
        self.persist_with(user, |u| u.phone_number_confirmed = confirmed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::transaction_log;
    use common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_email_rejects_blank() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = UserStore::new(db);

        let err = store.find_by_email("   ").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument("email")));
        assert!(transaction_log(store.into_connection()).is_empty());
    }

    #[tokio::test]
    async fn test_getters_read_entity_without_io() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = UserStore::new(db);
        let mut user = User::new("alice").with_email("alice@example.com");
        user.phone_number = Some("+15550100".to_string());
        user.phone_number_confirmed = true;

        assert_eq!(
            store.get_email(&user).await.unwrap().as_deref(),
            Some("alice@example.com")
        );
        assert!(!store.get_email_confirmed(&user).await.unwrap());
        assert_eq!(
            store.get_phone_number(&user).await.unwrap().as_deref(),
            Some("+15550100")
        );
        assert!(store.get_phone_number_confirmed(&user).await.unwrap());
        assert!(transaction_log(store.into_connection()).is_empty());
    }
}
