//! External login binding entity.

use sea_orm::entity::prelude::*;

use domain::UserLoginInfo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_logins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub login_provider: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub provider_key: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserLoginInfo {
    fn from(model: Model) -> Self {
        UserLoginInfo {
            login_provider: model.login_provider,
            provider_key: model.provider_key,
        }
    }
}
