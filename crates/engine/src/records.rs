//! Ledger entries.
//!
//! Amounts are integer minor currency units end to end. `occur_at` is the
//! business timestamp (when the money moved), distinct from the row's
//! `created_at`. `category_name_snapshot` is the display name captured at
//! write time; it only changes when a category edit is explicitly synced.

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

use crate::{EngineError, EntryKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub amount_minor: i64,
    pub category_id: i64,
    pub category_name_snapshot: Option<String>,
    pub note: Option<String>,
    pub occur_at: NaiveDateTime,
    pub is_hidden: bool,
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
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::receipts::Entity")]
    Receipts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A ledger entry as exposed by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub id: i64,
    pub user_id: String,
    pub kind: EntryKind,
    pub amount_minor: i64,
    pub category_id: i64,
    pub category_name_snapshot: Option<String>,
    pub note: Option<String>,
    pub occur_at: NaiveDateTime,
    pub is_hidden: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Model> for Record {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: EntryKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            category_id: model.category_id,
            category_name_snapshot: model.category_name_snapshot,
            note: model.note,
            occur_at: model.occur_at,
            is_hidden: model.is_hidden,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
