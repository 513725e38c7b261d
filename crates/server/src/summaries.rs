//! Summary API endpoints.

use api_types::{
    envelope,
    summary::{
        CalendarDayView, CalendarSummaryView, DayParams, DaySummaryView, MonthParams,
        MonthSummaryView,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::AuthedUser, server::ServerState};

pub async fn day(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Query(params): Query<DayParams>,
) -> Result<Json<envelope::Success<DaySummaryView>>, ServerError> {
    let summary = state.engine.day_summary(&auth.user_id, &params.day).await?;

    Ok(Json(envelope::Success::new(DaySummaryView {
        day: summary.day,
        count: summary.count,
        income_minor: summary.income_minor,
        expense_minor: summary.expense_minor,
        net_minor: summary.net_minor,
    })))
}

pub async fn month(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<envelope::Success<MonthSummaryView>>, ServerError> {
    let summary = state
        .engine
        .month_summary(&auth.user_id, &params.month)
        .await?;

    Ok(Json(envelope::Success::new(MonthSummaryView {
        month: summary.month,
        income_minor: summary.income_minor,
        expense_minor: summary.expense_minor,
        balance_minor: summary.balance_minor,
    })))
}

pub async fn calendar(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<envelope::Success<CalendarSummaryView>>, ServerError> {
    let summary = state
        .engine
        .calendar_summary(&auth.user_id, &params.month)
        .await?;

    Ok(Json(envelope::Success::new(CalendarSummaryView {
        month: summary.month,
        days: summary
            .days
            .into_iter()
            .map(|day| CalendarDayView {
                day: day.day,
                count: day.count,
                income_minor: day.income_minor,
                expense_minor: day.expense_minor,
            })
            .collect(),
    })))
}
