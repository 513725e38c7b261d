//! Category API endpoints.

use api_types::{
    category::{
        CategoryKeyView, CategoryListParams, CategoryNew, CategoryUpdate, CategoryUpdateResponse,
        CategoryView,
    },
    envelope,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use engine::{
    Category, CategoryUpdateOutcome, EntryKind, NewCategoryCmd, UpdateCategoryCmd,
};

use crate::{ServerError, server::AuthedUser, server::ServerState};

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        kind: category.kind.as_str().to_string(),
        name: category.name,
        icon: category.icon,
        color: category.color,
        is_hidden: category.is_hidden,
        sort: category.sort,
        is_preset: category.is_preset,
    }
}

fn parse_kind(value: &str) -> Result<EntryKind, ServerError> {
    EntryKind::try_from(value).map_err(ServerError::from)
}

pub async fn list(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Query(params): Query<CategoryListParams>,
) -> Result<Json<envelope::Success<Vec<CategoryView>>>, ServerError> {
    let kind = params.kind.as_deref().map(parse_kind).transpose()?;

    let categories = state
        .engine
        .list_categories(&auth.user_id, kind, params.include_hidden)
        .await?;

    Ok(Json(envelope::Success::new(
        categories.into_iter().map(category_view).collect(),
    )))
}

pub async fn add(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<envelope::Success<CategoryView>>, ServerError> {
    let cmd = NewCategoryCmd {
        kind: parse_kind(&payload.kind)?,
        name: payload.name,
        icon: payload.icon,
        color: payload.color,
        sort: payload.sort.unwrap_or(0),
        hidden: payload.is_hidden.unwrap_or(false),
    };

    let category = state.engine.add_category(&auth.user_id, cmd).await?;
    Ok(Json(envelope::Success::new(category_view(category))))
}

pub async fn update(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<envelope::Success<CategoryUpdateResponse>>, ServerError> {
    let cmd = UpdateCategoryCmd {
        kind: payload.kind.as_deref().map(parse_kind).transpose()?,
        name: payload.name,
        icon: payload.icon,
        color: payload.color,
        sort: payload.sort,
        hidden: payload.is_hidden,
        confirm: payload.confirm,
    };

    let outcome = state
        .engine
        .update_category(&auth.user_id, category_id, cmd)
        .await?;

    let response = match outcome {
        CategoryUpdateOutcome::Updated(category) => CategoryUpdateResponse {
            need_confirm: false,
            category: Some(category_view(category)),
            affected_records: None,
            current: None,
            proposed: None,
        },
        CategoryUpdateOutcome::NeedsConfirmation {
            affected_records,
            current,
            proposed,
        } => CategoryUpdateResponse {
            need_confirm: true,
            category: None,
            affected_records: Some(affected_records),
            current: Some(CategoryKeyView {
                kind: current.kind.as_str().to_string(),
                name: current.name,
            }),
            proposed: Some(CategoryKeyView {
                kind: proposed.kind.as_str().to_string(),
                name: proposed.name,
            }),
        },
    };

    Ok(Json(envelope::Success::new(response)))
}

pub async fn remove(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> Result<Json<envelope::Success<()>>, ServerError> {
    state
        .engine
        .delete_category(&auth.user_id, category_id)
        .await?;
    Ok(Json(envelope::Success::new(())))
}
