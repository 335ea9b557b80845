//! Claims attached to users.

use async_trait::async_trait;
use sea_orm::{ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::entities::user_claim;
use super::UserStore;
use common::guard::{require_key, require_text};
use common::AppResult;
use domain::{Claim, User};

#[async_trait]
pub trait UserClaimRepository: Send + Sync {
    async fn add_claim(&self, user: &User, claim: &Claim) -> AppResult<()>;

    /// Claims of the user, in insertion order
    async fn get_claims(&self, user: &User) -> AppResult<Vec<Claim>>;

    /// Remove every claim of the user with this type and value
    async fn remove_claim(&self, user: &User, claim: &Claim) -> AppResult<()>;
}

#[async_trait]
impl UserClaimRepository for UserStore {
    async fn add_claim(&self, user: &User, claim: &Claim) -> AppResult<()> {
        let user_id = require_key("user", user.id)?;
        let claim_type = require_text("claim.claim_type", &claim.claim_type)?;

        let model = user_claim::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            claim_type: Set(claim_type.to_owned()),
            claim_value: Set(claim.claim_value.clone()),
        };
        user_claim::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn get_claims(&self, user: &User) -> AppResult<Vec<Claim>> {
        let user_id = require_key("user", user.id)?;

        let rows = user_claim::Entity::find()
            .filter(user_claim::Column::UserId.eq(user_id))
            .order_by_asc(user_claim::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(Claim::from).collect())
    }

    async fn remove_claim(&self, user: &User, claim: &Claim) -> AppResult<()> {
        let user_id = require_key("user", user.id)?;
        let claim_type = require_text("claim.claim_type", &claim.claim_type)?;

        user_claim::Entity::delete_many()
            .filter(user_claim::Column::UserId.eq(user_id))
            .filter(user_claim::Column::ClaimType.eq(claim_type))
            .filter(user_claim::Column::ClaimValue.eq(claim.claim_value.as_str()))
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
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_claim_arguments_checked_before_backend() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = UserStore::new(db);
        let mut nil_user = User::new("alice");
        nil_user.id = Uuid::nil();

        let err = store
            .add_claim(&nil_user, &Claim::new("role", "reader"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument("user")));

        let err = store
            .remove_claim(&User::new("bob"), &Claim::new("", "reader"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument("claim.claim_type")));

        assert!(transaction_log(store.into_connection()).is_empty());
    }

    #[tokio::test]
    async fn test_get_claims_maps_rows() {
        let user = User::new("alice");
        let rows = vec![
            user_claim::Model {
                id: 1,
                user_id: user.id,
                claim_type: "department".to_string(),
                claim_value: "sales".to_string(),
            },
            user_claim::Model {
                id: 2,
                user_id: user.id,
                claim_type: "level".to_string(),
                claim_value: "3".to_string(),
            },
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        let store = UserStore::new(db);

        let claims = store.get_claims(&user).await.unwrap();

        assert_eq!(
            claims,
            vec![Claim::new("department", "sales"), Claim::new("level", "3")]
        );
    }
}
