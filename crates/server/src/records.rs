//! Ledger record API endpoints.

use api_types::{
    envelope,
    record::{
        ReceiptView, RecordDetail, RecordListParams, RecordListResponse, RecordNew, RecordUpdate,
        RecordView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use engine::{AddRecordCmd, EntryKind, NewReceipt, Record, RecordListFilter, UpdateRecordCmd};
use serde::Deserialize;

use crate::{ServerError, format_timestamp, server::AuthedUser, server::ServerState};

fn record_view(record: Record, category_color: Option<String>) -> RecordView {
    RecordView {
        id: record.id,
        kind: record.kind.as_str().to_string(),
        amount_minor: record.amount_minor,
        category_id: record.category_id,
        category_name_snapshot: record.category_name_snapshot,
        note: record.note,
        occur_at: format_timestamp(record.occur_at),
        is_hidden: record.is_hidden,
        category_color,
        created_at: format_timestamp(record.created_at),
        updated_at: format_timestamp(record.updated_at),
    }
}

fn parse_kind(value: &str) -> Result<EntryKind, ServerError> {
    EntryKind::try_from(value).map_err(ServerError::from)
}

pub async fn add(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Json(payload): Json<RecordNew>,
) -> Result<Json<envelope::Success<RecordView>>, ServerError> {
    let cmd = AddRecordCmd {
        kind: parse_kind(&payload.kind)?,
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        occur_at: payload.occur_at,
        note: payload.note,
        category_name_snapshot: payload.category_name_snapshot,
        receipts: payload
            .receipts
            .into_iter()
            .map(|receipt| NewReceipt {
                file_id: receipt.file_id,
                mime: receipt.mime,
                size_bytes: receipt.size_bytes.unwrap_or(0),
            })
            .collect(),
    };

    let record = state.engine.add_record(&auth.user_id, cmd).await?;
    Ok(Json(envelope::Success::new(record_view(record, None))))
}

pub async fn list(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Query(params): Query<RecordListParams>,
) -> Result<Json<envelope::Success<RecordListResponse>>, ServerError> {
    let filter = RecordListFilter {
        month: params.month,
        day: params.day,
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(20),
        only_hidden: params.only_hidden,
    };

    let page = state.engine.list_records(&auth.user_id, &filter).await?;

    Ok(Json(envelope::Success::new(RecordListResponse {
        items: page
            .records
            .into_iter()
            .map(|row| record_view(row.record, row.category_color))
            .collect(),
        total: page.total,
        page: filter.page,
        page_size: filter.page_size,
    })))
}

#[derive(Debug, Deserialize)]
pub struct GetParams {
    #[serde(default)]
    include_hidden: bool,
}

pub async fn get_detail(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Path(record_id): Path<i64>,
    Query(params): Query<GetParams>,
) -> Result<Json<envelope::Success<RecordDetail>>, ServerError> {
    let record = state
        .engine
        .record(&auth.user_id, record_id, params.include_hidden)
        .await?;
    let receipts = state
        .engine
        .record_receipts(&auth.user_id, record_id)
        .await?;

    Ok(Json(envelope::Success::new(RecordDetail {
        record: record_view(record, None),
        receipts: receipts
            .into_iter()
            .map(|receipt| ReceiptView {
                id: receipt.id,
                file_id: receipt.file_id,
                mime: receipt.mime,
                size_bytes: receipt.size_bytes,
            })
            .collect(),
    })))
}

pub async fn update(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Path(record_id): Path<i64>,
    Json(payload): Json<RecordUpdate>,
) -> Result<Json<envelope::Success<RecordView>>, ServerError> {
    let cmd = UpdateRecordCmd {
        kind: payload.kind.as_deref().map(parse_kind).transpose()?,
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        note: payload.note,
        occur_at: payload.occur_at,
        category_name_snapshot: payload.category_name_snapshot,
    };

    let record = state
        .engine
        .update_record(&auth.user_id, record_id, cmd)
        .await?;
    Ok(Json(envelope::Success::new(record_view(record, None))))
}

pub async fn remove(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Path(record_id): Path<i64>,
) -> Result<Json<envelope::Success<()>>, ServerError> {
    state.engine.delete_record(&auth.user_id, record_id).await?;
    Ok(Json(envelope::Success::new(())))
}

pub async fn restore(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Path(record_id): Path<i64>,
) -> Result<Json<envelope::Success<()>>, ServerError> {
    state
        .engine
        .restore_record(&auth.user_id, record_id)
        .await?;
    Ok(Json(envelope::Success::new(())))
}
