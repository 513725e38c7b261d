//! Income/expense buckets per user.
//!
//! A category is never physically deleted: "delete" hides it so historical
//! records keep a valid `category_id`. Preset rows are the seeded defaults
//! and reject deletion entirely.

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

use crate::{EngineError, EntryKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_hidden: bool,
    pub sort: i32,
    pub is_preset: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId"
    )]
    Users,
    #[sea_orm(has_many = "super::records::Entity")]
    Records,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A category as exposed by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub user_id: String,
    pub kind: EntryKind,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_hidden: bool,
    pub sort: i32,
    pub is_preset: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: EntryKind::try_from(model.kind.as_str())?,
            name: model.name,
            icon: model.icon,
            color: model.color,
            is_hidden: model.is_hidden,
            sort: model.sort,
            is_preset: model.is_preset,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
