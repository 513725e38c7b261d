use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDateTime;
use engine::EngineError;

pub use login::LoginClient;
pub use server::{run, run_with_listener, spawn_with_listener};
pub use token::{Claims, DEFAULT_TOKEN_DAYS, TokenIssuer};

mod categories;
mod login;
mod records;
mod server;
mod summaries;
mod token;
mod user;

pub mod types {
    pub mod category {
        pub use api_types::category::{
            CategoryListParams, CategoryNew, CategoryUpdate, CategoryUpdateResponse, CategoryView,
        };
    }

    pub mod record {
        pub use api_types::record::{
            ReceiptNew, ReceiptView, RecordDetail, RecordListParams, RecordListResponse, RecordNew,
            RecordUpdate, RecordView,
        };
    }

    pub mod summary {
        pub use api_types::summary::{
            CalendarDayView, CalendarSummaryView, DaySummaryView, MonthSummaryView,
        };
    }

    pub mod user {
        pub use api_types::user::{LoginRequest, UserProfile};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Unauthorized(String),
    Upstream(String),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidArgument(_) | EngineError::InvalidFormat(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_msg) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Upstream(err) => (StatusCode::BAD_GATEWAY, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(api_types::envelope::Error::new(error_msg))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Render a stored timestamp in the wire format.
pub(crate) fn format_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}
