//! Account profiles keyed by the externally issued user id.
//!
//! Rows are created lazily, the first time an external identifier is
//! resolved, and are never deleted by the engine.

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
    pub currency: String,
    pub status: i16,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::categories::Entity")]
    Categories,
    #[sea_orm(has_many = "super::records::Entity")]
    Records,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An account profile.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: i64,
    pub user_id: String,
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
    pub currency: String,
    pub status: i16,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            nick_name: model.nick_name,
            avatar_url: model.avatar_url,
            currency: model.currency,
            status: model.status,
            phone: model.phone,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
