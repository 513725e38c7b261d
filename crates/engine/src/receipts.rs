//! Receipt attachments.
//!
//! A receipt row is written only together with its parent record, inside the
//! same transaction, and is never updated afterwards. Hiding or restoring the
//! record leaves its receipts untouched.

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub record_id: i64,
    pub user_id: String,
    pub file_id: String,
    pub mime: Option<String>,
    pub size_bytes: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::records::Entity",
        from = "Column::RecordId",
        to = "super::records::Column::Id"
    )]
    Records,
}

impl Related<super::records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An attachment reference for a new record.
///
/// Entries with an empty `file_id` are skipped at write time.
#[derive(Clone, Debug, PartialEq)]
pub struct NewReceipt {
    pub file_id: String,
    pub mime: Option<String>,
    pub size_bytes: i64,
}

/// A stored receipt.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub id: i64,
    pub record_id: i64,
    pub file_id: String,
    pub mime: Option<String>,
    pub size_bytes: i64,
    pub created_at: NaiveDateTime,
}

impl From<Model> for Receipt {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            record_id: model.record_id,
            file_id: model.file_id,
            mime: model.mime,
            size_bytes: model.size_bytes,
            created_at: model.created_at,
        }
    }
}
