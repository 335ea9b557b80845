//! External login bindings for users.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use super::entities::{user, user_login};
use super::UserStore;
use crate::query::{placeholder, Join, RelatedQuery, TableSpec};
use common::guard::{require_key, require_text};
use common::AppResult;
use domain::{User, UserLoginInfo};

#[async_trait]
pub trait UserLoginRepository: Send + Sync {
    /// Bind an external login to the user
    async fn add_login(&self, user: &User, login: &UserLoginInfo) -> AppResult<()>;

    /// Find the user bound to an external login
    async fn find_by_login(&self, login: &UserLoginInfo) -> AppResult<Option<User>>;

    /// All logins bound to the user
    async fn get_logins(&self, user: &User) -> AppResult<Vec<UserLoginInfo>>;

    /// Remove one login binding
    async fn remove_login(&self, user: &User, login: &UserLoginInfo) -> AppResult<()>;
}

fn check_login(login: &UserLoginInfo) -> AppResult<(&str, &str)> {
    let provider = require_text("login.login_provider", &login.login_provider)?;
    let key = require_text("login.provider_key", &login.provider_key)?;
    Ok((provider, key))
}

#[async_trait]
impl UserLoginRepository for UserStore {
    async fn add_login(&self, user: &User, login: &UserLoginInfo) -> AppResult<()> {
        let user_id = require_key("user", user.id)?;
        let (provider, key) = check_login(login)?;

        let model = user_login::ActiveModel {
            login_provider: Set(provider.to_owned()),
            provider_key: Set(key.to_owned()),
            user_id: Set(user_id),
        };
        user_login::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn find_by_login(&self, login: &UserLoginInfo) -> AppResult<Option<User>> {
        let (provider, key) = check_login(login)?;

        let query = RelatedQuery::new(
            TableSpec::new(user::Entity, "u", user::Column::Id)?.all_columns(),
            TableSpec::new(user_login::Entity, "l", user_login::Column::UserId)?,
            Join::Left,
        );
        let logins = query.foreign();
        let sql = query.select(
            &format!(
                "WHERE {} = {} AND {} = {}",
                logins.qualify(user_login::Column::LoginProvider),
                placeholder(self.backend(), 1),
                logins.qualify(user_login::Column::ProviderKey),
                placeholder(self.backend(), 2),
            ),
            None,
        )?;

        let result = user::Entity::find()
            .from_raw_sql(self.statement(sql, [provider.into(), key.into()]))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(User::from))
    }

    async fn get_logins(&self, user: &User) -> AppResult<Vec<UserLoginInfo>> {
        let user_id = require_key("user", user.id)?;

        let rows = user_login::Entity::find()
            .filter(user_login::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(UserLoginInfo::from).collect())
    }

    async fn remove_login(&self, user: &User, login: &UserLoginInfo) -> AppResult<()> {
        let user_id = require_key("user", user.id)?;
        let (provider, key) = check_login(login)?;

        user_login::Entity::delete_many()
            .filter(user_login::Column::UserId.eq(user_id))
            .filter(user_login::Column::LoginProvider.eq(provider))
            .filter(user_login::Column::ProviderKey.eq(key))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::transaction_log;
    use common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn test_blank_login_rejected_before_backend() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = UserStore::new(db);
        let user = User::new("alice");

        let err = store
            .add_login(&user, &UserLoginInfo::new(" ", "123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument("login.login_provider")));

        let err = store
            .find_by_login(&UserLoginInfo::new("github", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument("login.provider_key")));

        assert!(transaction_log(store.into_connection()).is_empty());
    }

    #[tokio::test]
    async fn test_find_by_login_binds_provider_and_key() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let store = UserStore::new(db);

        let found = store
            .find_by_login(&UserLoginInfo::new("github", "12345"))
            .await
            .unwrap();

        assert!(found.is_none());
        assert_eq!(
            transaction_log(store.into_connection()),
            vec![Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                "SELECT u.* FROM users AS u LEFT JOIN user_logins AS l ON u.id = l.user_id \
                 WHERE l.login_provider = $1 AND l.provider_key = $2",
                ["github".into(), "12345".into()],
            )]
        );
    }
}
