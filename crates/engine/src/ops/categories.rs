use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Category, EngineError, EntryKind, NewCategoryCmd, ResultEngine, UpdateCategoryCmd, categories,
    records, util,
};

use super::{Engine, normalize_required_name, with_tx};

/// Seeded defaults: (kind, name, icon, color, sort).
const PRESET_CATALOG: [(EntryKind, &str, &str, &str, i32); 6] = [
    (EntryKind::Expense, "Dining", "food", "#FF8A00", 100),
    (EntryKind::Expense, "Transport", "traffic", "#2D7CFF", 90),
    (EntryKind::Expense, "Shopping", "shopping", "#FF4D4F", 80),
    (EntryKind::Expense, "Housing", "house", "#8B5CF6", 70),
    (EntryKind::Income, "Salary", "salary", "#34C759", 100),
    (EntryKind::Income, "Bonus", "bonus", "#10B981", 90),
];

/// The (name, kind) pair that records snapshot from their category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryKey {
    pub name: String,
    pub kind: EntryKind,
}

/// Result of [`Engine::update_category`].
#[derive(Clone, Debug, PartialEq)]
pub enum CategoryUpdateOutcome {
    /// The update was applied; when it was a confirmed name/kind change the
    /// snapshots of referencing records were rewritten in the same
    /// transaction.
    Updated(Category),
    /// A name/kind change touches live records and was not confirmed.
    /// Nothing was written.
    NeedsConfirmation {
        affected_records: u64,
        current: CategoryKey,
        proposed: CategoryKey,
    },
}

impl Engine {
    /// Create a category.
    ///
    /// The (user, kind, trimmed name) triple must be free; the check runs at
    /// write time inside the insert transaction, there is no database-level
    /// unique constraint behind it.
    pub async fn add_category(
        &self,
        user_id: &str,
        cmd: NewCategoryCmd,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category")?;

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Kind.eq(cmd.kind.as_str()))
                .filter(categories::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(name));
            }

            let now = util::now();
            let active = categories::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                name: ActiveValue::Set(name),
                icon: ActiveValue::Set(cmd.icon),
                color: ActiveValue::Set(cmd.color),
                is_hidden: ActiveValue::Set(cmd.hidden),
                sort: ActiveValue::Set(cmd.sort),
                is_preset: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            let model = active.insert(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Return a category owned by the user.
    pub async fn category(&self, user_id: &str, category_id: i64) -> ResultEngine<Category> {
        let model = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("category".to_string()))?;
        Category::try_from(model)
    }

    /// Update a category, propagating a confirmed name/kind change into the
    /// snapshots of every referencing record.
    ///
    /// A key change over ≥1 referencing record without `confirm` returns
    /// [`CategoryUpdateOutcome::NeedsConfirmation`] and writes nothing. With
    /// `confirm`, the category update and the bulk snapshot rewrite commit
    /// together or not at all.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: i64,
        cmd: UpdateCategoryCmd,
    ) -> ResultEngine<CategoryUpdateOutcome> {
        with_tx!(self, |db_tx| {
            self.update_category_in(&db_tx, user_id, category_id, cmd)
                .await
        })
    }

    async fn update_category_in(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        category_id: i64,
        cmd: UpdateCategoryCmd,
    ) -> ResultEngine<CategoryUpdateOutcome> {
        let model = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("category".to_string()))?;
        let current_kind = EntryKind::try_from(model.kind.as_str())?;

        let new_name = cmd.name.clone().filter(|name| *name != model.name);
        let new_kind = cmd.kind.filter(|kind| *kind != current_kind);
        let key_change = new_name.is_some() || new_kind.is_some();

        if key_change && !cmd.confirm {
            let affected = records::Entity::find()
                .filter(records::Column::UserId.eq(user_id))
                .filter(records::Column::CategoryId.eq(category_id))
                .count(db_tx)
                .await?;
            if affected > 0 {
                return Ok(CategoryUpdateOutcome::NeedsConfirmation {
                    affected_records: affected,
                    current: CategoryKey {
                        name: model.name.clone(),
                        kind: current_kind,
                    },
                    proposed: CategoryKey {
                        name: cmd.name.unwrap_or(model.name),
                        kind: cmd.kind.unwrap_or(current_kind),
                    },
                });
            }
        }

        let mut active = categories::ActiveModel {
            id: ActiveValue::Set(model.id),
            updated_at: ActiveValue::Set(util::now()),
            ..Default::default()
        };
        if let Some(kind) = cmd.kind {
            active.kind = ActiveValue::Set(kind.as_str().to_string());
        }
        if let Some(name) = cmd.name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(icon) = cmd.icon {
            active.icon = ActiveValue::Set(Some(icon));
        }
        if let Some(color) = cmd.color {
            active.color = ActiveValue::Set(Some(color));
        }
        if let Some(sort) = cmd.sort {
            active.sort = ActiveValue::Set(sort);
        }
        if let Some(hidden) = cmd.hidden {
            active.is_hidden = ActiveValue::Set(hidden);
        }
        let updated = active.update(db_tx).await?;

        if cmd.confirm && key_change {
            // One multi-row UPDATE; per-row hooks are irrelevant here.
            let mut sync = records::Entity::update_many()
                .filter(records::Column::UserId.eq(user_id))
                .filter(records::Column::CategoryId.eq(category_id));
            if let Some(name) = &new_name {
                sync = sync.col_expr(
                    records::Column::CategoryNameSnapshot,
                    Expr::value(name.clone()),
                );
            }
            if let Some(kind) = new_kind {
                sync = sync.col_expr(records::Column::Kind, Expr::value(kind.as_str()));
            }
            sync.exec(db_tx).await?;
        }

        Ok(CategoryUpdateOutcome::Updated(Category::try_from(updated)?))
    }

    /// Soft-delete a category.
    ///
    /// Preset rows reject deletion so that seeded ids stay resolvable; user
    /// rows are hidden, never removed, to keep `category_id` references in
    /// historical records valid.
    pub async fn delete_category(&self, user_id: &str, category_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("category".to_string()))?;

            if model.is_preset {
                return Err(EngineError::InvalidArgument(
                    "preset categories cannot be deleted, hide them instead".to_string(),
                ));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::Set(model.id),
                is_hidden: ActiveValue::Set(true),
                updated_at: ActiveValue::Set(util::now()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// List categories, sort weight descending then newest first.
    pub async fn list_categories(
        &self,
        user_id: &str,
        kind: Option<EntryKind>,
        include_hidden: bool,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find().filter(categories::Column::UserId.eq(user_id));
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        if !include_hidden {
            query = query.filter(categories::Column::IsHidden.eq(false));
        }

        let models = query
            .order_by_desc(categories::Column::Sort)
            .order_by_desc(categories::Column::Id)
            .all(&self.database)
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }

    /// Seed the preset catalog for a user.
    ///
    /// Idempotent: existing rows only get empty icon/color and zero sort
    /// backfilled, a value the user customized is never overwritten.
    pub async fn seed_default_categories(&self, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.seed_defaults_in(&db_tx, user_id).await
        })
    }

    pub(super) async fn seed_defaults_in(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<()> {
        for (kind, name, icon, color, sort) in PRESET_CATALOG {
            let existing = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Kind.eq(kind.as_str()))
                .filter(categories::Column::Name.eq(name))
                .one(db_tx)
                .await?;

            match existing {
                Some(model) => {
                    let fill_icon = model.icon.as_deref().is_none_or(str::is_empty);
                    let fill_color = model.color.as_deref().is_none_or(str::is_empty);
                    let fill_sort = model.sort == 0;
                    if !(fill_icon || fill_color || fill_sort) {
                        continue;
                    }

                    let mut active = categories::ActiveModel {
                        id: ActiveValue::Set(model.id),
                        updated_at: ActiveValue::Set(util::now()),
                        ..Default::default()
                    };
                    if fill_icon {
                        active.icon = ActiveValue::Set(Some(icon.to_string()));
                    }
                    if fill_color {
                        active.color = ActiveValue::Set(Some(color.to_string()));
                    }
                    if fill_sort {
                        active.sort = ActiveValue::Set(sort);
                    }
                    active.update(db_tx).await?;
                }
                None => {
                    let now = util::now();
                    let active = categories::ActiveModel {
                        user_id: ActiveValue::Set(user_id.to_string()),
                        kind: ActiveValue::Set(kind.as_str().to_string()),
                        name: ActiveValue::Set(name.to_string()),
                        icon: ActiveValue::Set(Some(icon.to_string())),
                        color: ActiveValue::Set(Some(color.to_string())),
                        is_hidden: ActiveValue::Set(false),
                        sort: ActiveValue::Set(sort),
                        is_preset: ActiveValue::Set(true),
                        created_at: ActiveValue::Set(now),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    active.insert(db_tx).await?;
                }
            }
        }

        Ok(())
    }
}
