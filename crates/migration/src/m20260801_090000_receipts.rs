//! Adds the `receipts` table.
//!
//! Receipts are written only together with their parent record, inside the
//! same transaction, and are never updated afterwards.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Receipts {
    Table,
    Id,
    RecordId,
    UserId,
    FileId,
    Mime,
    SizeBytes,
    CreatedAt,
}

#[derive(Iden)]
enum Records {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Receipts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Receipts::RecordId).integer().not_null())
                    .col(ColumnDef::new(Receipts::UserId).string().not_null())
                    .col(ColumnDef::new(Receipts::FileId).string().not_null())
                    .col(ColumnDef::new(Receipts::Mime).string())
                    .col(
                        ColumnDef::new(Receipts::SizeBytes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Receipts::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-receipts-record_id")
                            .from(Receipts::Table, Receipts::RecordId)
                            .to(Records::Table, Records::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-receipts-user_id")
                            .from(Receipts::Table, Receipts::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-receipts-record_id")
                    .table(Receipts::Table)
                    .col(Receipts::RecordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await?;
        Ok(())
    }
}
