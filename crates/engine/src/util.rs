//! Internal helpers for timestamp parsing and window computation.
//!
//! These utilities are **not** part of the public API. They centralize the
//! textual date contract so every operation accepts and renders the same
//! shapes.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::{EngineError, ResultEngine};

/// Parse a business timestamp.
///
/// Accepted shapes, first match wins:
/// 1. `YYYY-MM-DD HH:MM:SS`
/// 2. `YYYY-MM-DD` (midnight implied)
/// 3. ISO-8601, with or without an offset; the offset is dropped after
///    parsing so the wall-clock time is kept (`...Z` keeps its UTC wall time)
pub(crate) fn parse_occur_at(input: &str) -> ResultEngine<NaiveDateTime> {
    let input = input.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }

    Err(EngineError::InvalidFormat(format!(
        "unrecognized occur_at: {input}"
    )))
}

/// Half-open window `[day 00:00:00, day+1 00:00:00)` for a `YYYY-MM-DD` key.
pub(crate) fn day_window(day: &str) -> ResultEngine<(NaiveDateTime, NaiveDateTime)> {
    let date = NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidFormat(format!("day must be YYYY-MM-DD, got: {day}")))?;
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidFormat(format!("day must be YYYY-MM-DD, got: {day}")))?;
    let end = date
        .succ_opt()
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .ok_or_else(|| EngineError::InvalidFormat(format!("day out of range: {day}")))?;
    Ok((start, end))
}

/// Half-open window `[first-of-month, first-of-next-month)` for a `YYYY-MM`
/// key. December wraps to January of the following year.
pub(crate) fn month_window(month: &str) -> ResultEngine<(NaiveDateTime, NaiveDateTime)> {
    let month = month.trim();
    let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidFormat(format!("month must be YYYY-MM, got: {month}")))?;

    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| EngineError::InvalidFormat(format!("month out of range: {month}")))?;

    let start = first
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidFormat(format!("month out of range: {month}")))?;
    let end = next
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidFormat(format!("month out of range: {month}")))?;
    Ok((start, end))
}

/// Current row timestamp, truncated to whole seconds so stored text stays in
/// the `YYYY-MM-DD HH:MM:SS` shape.
pub(crate) fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}
