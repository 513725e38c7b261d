use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, User, categories, users, util};

use super::{Engine, normalize_optional_text, with_tx};

/// Currency assigned to accounts created by the resolver.
pub(super) const DEFAULT_CURRENCY: &str = "CNY";

impl Engine {
    /// Resolve an external identifier to an account, creating it on first
    /// sight.
    ///
    /// For an existing account the display fields are refreshed only when the
    /// incoming value is non-empty and different. An account that has no
    /// categories at all (of any visibility) gets the default set seeded
    /// again, so profiles that lost their seed heal on the next login.
    pub async fn resolve_user(
        &self,
        external_id: &str,
        nick_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> ResultEngine<User> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(EngineError::InvalidArgument(
                "user id must not be empty".to_string(),
            ));
        }
        let nick_name = normalize_optional_text(nick_name);
        let avatar_url = normalize_optional_text(avatar_url);

        with_tx!(self, |db_tx| {
            self.resolve_user_in(&db_tx, external_id, nick_name, avatar_url)
                .await
        })
    }

    /// Return the account for an external identifier.
    pub async fn user(&self, external_id: &str) -> ResultEngine<User> {
        let model = users::Entity::find()
            .filter(users::Column::UserId.eq(external_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("user".to_string()))?;
        Ok(User::from(model))
    }

    async fn resolve_user_in(
        &self,
        db_tx: &DatabaseTransaction,
        external_id: &str,
        nick_name: Option<String>,
        avatar_url: Option<String>,
    ) -> ResultEngine<User> {
        let existing = users::Entity::find()
            .filter(users::Column::UserId.eq(external_id))
            .one(db_tx)
            .await?;

        let model = match existing {
            Some(model) => {
                let new_nick =
                    nick_name.filter(|incoming| model.nick_name.as_deref() != Some(incoming));
                let new_avatar =
                    avatar_url.filter(|incoming| model.avatar_url.as_deref() != Some(incoming));

                let model = if new_nick.is_some() || new_avatar.is_some() {
                    let mut active = users::ActiveModel {
                        id: ActiveValue::Set(model.id),
                        updated_at: ActiveValue::Set(util::now()),
                        ..Default::default()
                    };
                    if let Some(nick) = new_nick {
                        active.nick_name = ActiveValue::Set(Some(nick));
                    }
                    if let Some(avatar) = new_avatar {
                        active.avatar_url = ActiveValue::Set(Some(avatar));
                    }
                    active.update(db_tx).await?
                } else {
                    model
                };

                let category_count = categories::Entity::find()
                    .filter(categories::Column::UserId.eq(external_id))
                    .count(db_tx)
                    .await?;
                if category_count == 0 {
                    self.seed_defaults_in(db_tx, external_id).await?;
                }

                model
            }
            None => {
                let now = util::now();
                let active = users::ActiveModel {
                    user_id: ActiveValue::Set(external_id.to_string()),
                    nick_name: ActiveValue::Set(nick_name),
                    avatar_url: ActiveValue::Set(avatar_url),
                    currency: ActiveValue::Set(DEFAULT_CURRENCY.to_string()),
                    status: ActiveValue::Set(1),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                };
                let model = active.insert(db_tx).await?;
                self.seed_defaults_in(db_tx, external_id).await?;
                model
            }
        };

        Ok(User::from(model))
    }
}
