//! User claim entity.

use sea_orm::entity::prelude::*;

use domain::Claim;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_claims")]
pub struct Model {
    /// Synthetic key, assigned by the backend
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub claim_type: String,
    pub claim_value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Claim {
    fn from(model: Model) -> Self {
        Claim {
            claim_type: model.claim_type,
            claim_value: model.claim_value,
        }
    }
}
