use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    AddRecordCmd, EngineError, Receipt, Record, ResultEngine, UpdateRecordCmd, categories,
    receipts, records, util,
};

use super::{Engine, with_tx};

/// Filters for listing records.
///
/// `day` and `month` narrow the window to one calendar day or month; when
/// both are present `day` wins. `only_hidden` flips between the normal view
/// and the trash view, a page never mixes the two.
#[derive(Clone, Debug)]
pub struct RecordListFilter {
    pub month: Option<String>,
    pub day: Option<String>,
    /// 1-indexed page number.
    pub page: u64,
    pub page_size: u64,
    pub only_hidden: bool,
}

impl Default for RecordListFilter {
    fn default() -> Self {
        Self {
            month: None,
            day: None,
            page: 1,
            page_size: 20,
            only_hidden: false,
        }
    }
}

/// One listed record with the color of its category, when that category
/// still resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordRow {
    pub record: Record,
    pub category_color: Option<String>,
}

/// A page of records plus the total count over the whole filtered set.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordPage {
    pub records: Vec<RecordRow>,
    pub total: u64,
}

impl Engine {
    /// Create a record, atomically with its receipt attachments.
    ///
    /// Receipts with an empty file reference are skipped; the rest insert in
    /// the same transaction as the record, so either everything persists or
    /// nothing does.
    pub async fn add_record(&self, user_id: &str, cmd: AddRecordCmd) -> ResultEngine<Record> {
        if cmd.amount_minor < 0 {
            return Err(EngineError::InvalidArgument(
                "amount_minor must be >= 0".to_string(),
            ));
        }
        let occur_at = util::parse_occur_at(&cmd.occur_at)?;

        with_tx!(self, |db_tx| {
            let now = util::now();
            let active = records::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                category_id: ActiveValue::Set(cmd.category_id),
                category_name_snapshot: ActiveValue::Set(cmd.category_name_snapshot),
                note: ActiveValue::Set(cmd.note),
                occur_at: ActiveValue::Set(occur_at),
                is_hidden: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            let model = active.insert(&db_tx).await?;

            for receipt in &cmd.receipts {
                let file_id = receipt.file_id.trim();
                if file_id.is_empty() {
                    continue;
                }
                let receipt_active = receipts::ActiveModel {
                    record_id: ActiveValue::Set(model.id),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    file_id: ActiveValue::Set(file_id.to_string()),
                    mime: ActiveValue::Set(receipt.mime.clone()),
                    size_bytes: ActiveValue::Set(receipt.size_bytes),
                    created_at: ActiveValue::Set(now),
                    ..Default::default()
                };
                receipt_active.insert(&db_tx).await?;
            }

            Record::try_from(model)
        })
    }

    /// Return a record owned by the user.
    pub async fn record(
        &self,
        user_id: &str,
        record_id: i64,
        include_hidden: bool,
    ) -> ResultEngine<Record> {
        let mut query = records::Entity::find_by_id(record_id)
            .filter(records::Column::UserId.eq(user_id));
        if !include_hidden {
            query = query.filter(records::Column::IsHidden.eq(false));
        }
        let model = query
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("record".to_string()))?;
        Record::try_from(model)
    }

    /// Return the receipts attached to a record.
    pub async fn record_receipts(
        &self,
        user_id: &str,
        record_id: i64,
    ) -> ResultEngine<Vec<Receipt>> {
        let models = receipts::Entity::find()
            .filter(receipts::Column::UserId.eq(user_id))
            .filter(receipts::Column::RecordId.eq(record_id))
            .order_by_asc(receipts::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Receipt::from).collect())
    }

    /// Update a record.
    ///
    /// Hidden records do not resolve here; restore first. Returns the new
    /// persisted state.
    pub async fn update_record(
        &self,
        user_id: &str,
        record_id: i64,
        cmd: UpdateRecordCmd,
    ) -> ResultEngine<Record> {
        if let Some(amount_minor) = cmd.amount_minor
            && amount_minor < 0
        {
            return Err(EngineError::InvalidArgument(
                "amount_minor must be >= 0".to_string(),
            ));
        }
        let occur_at = cmd
            .occur_at
            .as_deref()
            .map(util::parse_occur_at)
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = records::Entity::find_by_id(record_id)
                .filter(records::Column::UserId.eq(user_id))
                .filter(records::Column::IsHidden.eq(false))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("record".to_string()))?;

            let mut active = records::ActiveModel {
                id: ActiveValue::Set(model.id),
                updated_at: ActiveValue::Set(util::now()),
                ..Default::default()
            };
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(amount_minor) = cmd.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(category_id) = cmd.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(note) = cmd.note {
                active.note = ActiveValue::Set(Some(note));
            }
            if let Some(occur_at) = occur_at {
                active.occur_at = ActiveValue::Set(occur_at);
            }
            if let Some(snapshot) = cmd.category_name_snapshot {
                active.category_name_snapshot = ActiveValue::Set(Some(snapshot));
            }

            let updated = active.update(&db_tx).await?;
            Record::try_from(updated)
        })
    }

    /// Soft-delete a record. Recoverable with [`Engine::restore_record`].
    pub async fn delete_record(&self, user_id: &str, record_id: i64) -> ResultEngine<()> {
        self.set_record_hidden(user_id, record_id, true).await
    }

    /// Bring a soft-deleted record back into the normal view.
    ///
    /// The lookup ignores the hidden filter so it finds exactly what
    /// `delete_record` just hid.
    pub async fn restore_record(&self, user_id: &str, record_id: i64) -> ResultEngine<()> {
        self.set_record_hidden(user_id, record_id, false).await
    }

    async fn set_record_hidden(
        &self,
        user_id: &str,
        record_id: i64,
        hidden: bool,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = records::Entity::find_by_id(record_id)
                .filter(records::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("record".to_string()))?;

            let active = records::ActiveModel {
                id: ActiveValue::Set(model.id),
                is_hidden: ActiveValue::Set(hidden),
                updated_at: ActiveValue::Set(util::now()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// List records, newest first by `(occur_at, id)`.
    ///
    /// Every row carries its category color through an outer join: a record
    /// whose category no longer resolves lists with a null color instead of
    /// disappearing. `total` counts the whole filtered set, not the page.
    pub async fn list_records(
        &self,
        user_id: &str,
        filter: &RecordListFilter,
    ) -> ResultEngine<RecordPage> {
        let window = if let Some(day) = &filter.day {
            Some(util::day_window(day)?)
        } else if let Some(month) = &filter.month {
            Some(util::month_window(month)?)
        } else {
            None
        };
        let page = filter.page.max(1);
        let page_size = filter.page_size.max(1);

        with_tx!(self, |db_tx| {
            let mut query = records::Entity::find()
                .filter(records::Column::UserId.eq(user_id))
                .filter(records::Column::IsHidden.eq(filter.only_hidden));
            if let Some((start, end)) = window {
                query = query
                    .filter(records::Column::OccurAt.gte(start))
                    .filter(records::Column::OccurAt.lt(end));
            }

            let total = query.clone().count(&db_tx).await?;

            let rows = query
                .find_also_related(categories::Entity)
                .order_by_desc(records::Column::OccurAt)
                .order_by_desc(records::Column::Id)
                .offset((page - 1) * page_size)
                .limit(page_size)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (model, category) in rows {
                // A category owned by someone else counts as unresolvable.
                let category_color = category
                    .filter(|c| c.user_id == user_id)
                    .and_then(|c| c.color);
                out.push(RecordRow {
                    record: Record::try_from(model)?,
                    category_color,
                });
            }

            Ok(RecordPage {
                records: out,
                total,
            })
        })
    }
}
