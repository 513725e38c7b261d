use sea_orm::{ConnectionTrait, Statement};

use crate::{ResultEngine, util};

use super::Engine;

/// Totals for one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySummary {
    pub day: String,
    pub count: i64,
    pub income_minor: i64,
    pub expense_minor: i64,
    pub net_minor: i64,
}

/// Totals for one month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: String,
    pub income_minor: i64,
    pub expense_minor: i64,
    pub balance_minor: i64,
}

/// Totals for one calendar date inside a month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub day: String,
    pub count: i64,
    pub income_minor: i64,
    pub expense_minor: i64,
}

/// Per-date totals for a month; dates without records are omitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarSummary {
    pub month: String,
    pub days: Vec<CalendarDay>,
}

const CONDITIONAL_SUMS: &str = "COALESCE(SUM(CASE WHEN type = 'income' THEN amount_minor ELSE 0 END), 0) AS income, \
     COALESCE(SUM(CASE WHEN type = 'expense' THEN amount_minor ELSE 0 END), 0) AS expense";

impl Engine {
    /// Totals over `[day 00:00:00, day+1 00:00:00)`, hidden records excluded.
    ///
    /// Sums are conditional on the record's own type; the category's current
    /// type plays no part.
    pub async fn day_summary(&self, user_id: &str, day: &str) -> ResultEngine<DaySummary> {
        let (start, end) = util::day_window(day)?;
        let backend = self.database.get_database_backend();

        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT COUNT(id) AS cnt, {CONDITIONAL_SUMS} \
                 FROM records \
                 WHERE user_id = ? AND is_hidden = 0 AND occur_at >= ? AND occur_at < ?"
            ),
            vec![user_id.into(), start.into(), end.into()],
        );
        let row = self.database.query_one(stmt).await?;

        let count: i64 = row
            .as_ref()
            .and_then(|r| r.try_get("", "cnt").ok())
            .unwrap_or(0);
        let income_minor: i64 = row
            .as_ref()
            .and_then(|r| r.try_get("", "income").ok())
            .unwrap_or(0);
        let expense_minor: i64 = row
            .as_ref()
            .and_then(|r| r.try_get("", "expense").ok())
            .unwrap_or(0);

        Ok(DaySummary {
            day: day.trim().to_string(),
            count,
            income_minor,
            expense_minor,
            net_minor: income_minor - expense_minor,
        })
    }

    /// Totals over `[first-of-month, first-of-next-month)`, hidden records
    /// excluded. December wraps into January of the following year.
    pub async fn month_summary(&self, user_id: &str, month: &str) -> ResultEngine<MonthSummary> {
        let (start, end) = util::month_window(month)?;
        let backend = self.database.get_database_backend();

        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT {CONDITIONAL_SUMS} \
                 FROM records \
                 WHERE user_id = ? AND is_hidden = 0 AND occur_at >= ? AND occur_at < ?"
            ),
            vec![user_id.into(), start.into(), end.into()],
        );
        let row = self.database.query_one(stmt).await?;

        let income_minor: i64 = row
            .as_ref()
            .and_then(|r| r.try_get("", "income").ok())
            .unwrap_or(0);
        let expense_minor: i64 = row
            .as_ref()
            .and_then(|r| r.try_get("", "expense").ok())
            .unwrap_or(0);

        Ok(MonthSummary {
            month: month.trim().to_string(),
            income_minor,
            expense_minor,
            balance_minor: income_minor - expense_minor,
        })
    }

    /// Per-date totals for a month, for calendar markers.
    pub async fn calendar_summary(
        &self,
        user_id: &str,
        month: &str,
    ) -> ResultEngine<CalendarSummary> {
        let (start, end) = util::month_window(month)?;
        let backend = self.database.get_database_backend();

        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT date(occur_at) AS day, COUNT(id) AS cnt, {CONDITIONAL_SUMS} \
                 FROM records \
                 WHERE user_id = ? AND is_hidden = 0 AND occur_at >= ? AND occur_at < ? \
                 GROUP BY date(occur_at) \
                 ORDER BY day ASC"
            ),
            vec![user_id.into(), start.into(), end.into()],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            days.push(CalendarDay {
                day: row.try_get("", "day")?,
                count: row.try_get("", "cnt")?,
                income_minor: row.try_get("", "income")?,
                expense_minor: row.try_get("", "expense")?,
            });
        }

        Ok(CalendarSummary {
            month: month.trim().to_string(),
            days,
        })
    }
}
