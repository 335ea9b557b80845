//! Role database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Role {
    fn from(model: Model) -> Self {
        Role {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<&Role> for ActiveModel {
    fn from(role: &Role) -> Self {
        ActiveModel {
            id: Set(role.id),
            name: Set(role.name.clone()),
        }
    }
}
