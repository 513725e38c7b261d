//! Request/response types shared by the HTTP server and its clients.
//!
//! Money is always an integer count of minor currency units. Timestamps are
//! rendered as `YYYY-MM-DD HH:MM:SS` strings; month keys are `YYYY-MM` and
//! day keys `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

pub mod envelope {
    use super::*;

    /// Successful response body: `{"code": 0, "data": ...}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Success<T> {
        pub code: i32,
        pub data: T,
    }

    impl<T> Success<T> {
        pub fn new(data: T) -> Self {
            Self { code: 0, data }
        }
    }

    /// Error response body: `{"code": -1, "errorMsg": "..."}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Error {
        pub code: i32,
        #[serde(rename = "errorMsg")]
        pub error_msg: String,
    }

    impl Error {
        pub fn new(error_msg: impl Into<String>) -> Self {
            Self {
                code: -1,
                error_msg: error_msg.into(),
            }
        }
    }

    /// Login response body, carrying the bearer token beside the profile.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login<T> {
        pub code: i32,
        pub msg: String,
        pub token: String,
        pub data: T,
    }

    impl<T> Login<T> {
        pub fn new(token: impl Into<String>, data: T) -> Self {
            Self {
                code: 0,
                msg: "login ok".to_string(),
                token: token.into(),
                data,
            }
        }
    }
}

pub mod user {
    use super::*;

    /// Body of the login-code exchange request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub code: String,
        #[serde(default, alias = "nickName")]
        pub nick_name: Option<String>,
        #[serde(default, alias = "avatarUrl")]
        pub avatar_url: Option<String>,
    }

    /// Profile as returned by login and whoami.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserProfile {
        pub user_id: String,
        pub login_type: String,
        pub nick_name: Option<String>,
        pub avatar_url: Option<String>,
        pub currency: String,
        pub status: i16,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub created_at: String,
        pub updated_at: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        #[serde(rename = "type")]
        pub kind: String,
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_hidden: bool,
        pub sort: i32,
        pub is_preset: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        #[serde(rename = "type")]
        pub kind: String,
        pub name: String,
        #[serde(default)]
        pub icon: Option<String>,
        #[serde(default)]
        pub color: Option<String>,
        #[serde(default)]
        pub sort: Option<i32>,
        #[serde(default)]
        pub is_hidden: Option<bool>,
    }

    /// Sparse update; absent fields stay unchanged. `confirm` acknowledges a
    /// name/type change that rewrites record snapshots.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default, rename = "type")]
        pub kind: Option<String>,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub icon: Option<String>,
        #[serde(default)]
        pub color: Option<String>,
        #[serde(default)]
        pub sort: Option<i32>,
        #[serde(default)]
        pub is_hidden: Option<bool>,
        #[serde(default)]
        pub confirm: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListParams {
        #[serde(default, rename = "type")]
        pub kind: Option<String>,
        #[serde(default)]
        pub include_hidden: bool,
    }

    /// The identity of a category as seen by its records.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryKeyView {
        #[serde(rename = "type")]
        pub kind: String,
        pub name: String,
    }

    /// Outcome of a category update. When `need_confirm` is set nothing was
    /// written and the caller should repeat the request with `confirm: true`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdateResponse {
        pub need_confirm: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<CategoryView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub affected_records: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub current: Option<CategoryKeyView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub proposed: Option<CategoryKeyView>,
    }
}

pub mod record {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptNew {
        pub file_id: String,
        #[serde(default)]
        pub mime: Option<String>,
        #[serde(default)]
        pub size_bytes: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptView {
        pub id: i64,
        pub file_id: String,
        pub mime: Option<String>,
        pub size_bytes: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordNew {
        #[serde(rename = "type")]
        pub kind: String,
        pub amount_minor: i64,
        pub category_id: i64,
        /// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, or ISO-8601.
        pub occur_at: String,
        #[serde(default)]
        pub note: Option<String>,
        #[serde(default)]
        pub category_name_snapshot: Option<String>,
        #[serde(default)]
        pub receipts: Vec<ReceiptNew>,
    }

    /// Sparse update; absent fields stay unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordUpdate {
        #[serde(default, rename = "type")]
        pub kind: Option<String>,
        #[serde(default)]
        pub amount_minor: Option<i64>,
        #[serde(default)]
        pub category_id: Option<i64>,
        #[serde(default)]
        pub note: Option<String>,
        #[serde(default)]
        pub occur_at: Option<String>,
        #[serde(default)]
        pub category_name_snapshot: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordView {
        pub id: i64,
        #[serde(rename = "type")]
        pub kind: String,
        pub amount_minor: i64,
        pub category_id: i64,
        pub category_name_snapshot: Option<String>,
        pub note: Option<String>,
        pub occur_at: String,
        pub is_hidden: bool,
        /// Joined from the category when it still resolves.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_color: Option<String>,
        pub created_at: String,
        pub updated_at: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordDetail {
        #[serde(flatten)]
        pub record: RecordView,
        pub receipts: Vec<ReceiptView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordListParams {
        #[serde(default)]
        pub month: Option<String>,
        #[serde(default)]
        pub day: Option<String>,
        #[serde(default)]
        pub page: Option<u64>,
        #[serde(default)]
        pub page_size: Option<u64>,
        #[serde(default)]
        pub only_hidden: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordListResponse {
        pub items: Vec<RecordView>,
        /// Count over the whole filtered set, not the page.
        pub total: u64,
        pub page: u64,
        pub page_size: u64,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DaySummaryView {
        pub day: String,
        pub count: i64,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthSummaryView {
        pub month: String,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarDayView {
        pub day: String,
        pub count: i64,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarSummaryView {
        pub month: String,
        pub days: Vec<CalendarDayView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayParams {
        pub day: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthParams {
        pub month: String,
    }
}
