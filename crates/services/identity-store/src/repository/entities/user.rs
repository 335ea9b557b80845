//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_name: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub password_hash: Option<String>,
    pub security_stamp: Option<String>,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    pub lockout_end_date_utc: Option<DateTimeUtc>,
    pub access_failed_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            email_confirmed: model.email_confirmed,
            phone_number: model.phone_number,
            phone_number_confirmed: model.phone_number_confirmed,
            password_hash: model.password_hash,
            security_stamp: model.security_stamp,
            two_factor_enabled: model.two_factor_enabled,
            lockout_enabled: model.lockout_enabled,
            lockout_end_date_utc: model.lockout_end_date_utc,
            access_failed_count: model.access_failed_count,
        }
    }
}

/// Full-row active model; every column is written.
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id),
            user_name: Set(user.user_name.clone()),
            email: Set(user.email.clone()),
            email_confirmed: Set(user.email_confirmed),
            phone_number: Set(user.phone_number.clone()),
            phone_number_confirmed: Set(user.phone_number_confirmed),
            password_hash: Set(user.password_hash.clone()),
            security_stamp: Set(user.security_stamp.clone()),
            two_factor_enabled: Set(user.two_factor_enabled),
            lockout_enabled: Set(user.lockout_enabled),
            lockout_end_date_utc: Set(user.lockout_end_date_utc),
            access_failed_count: Set(user.access_failed_count),
        }
    }
}
