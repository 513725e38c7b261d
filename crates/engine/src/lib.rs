//! The bookkeeping core: ledger records, categories, and their summaries.
//!
//! The engine owns every rule about how records and categories stay
//! consistent: write-time category uniqueness, preset protection, default
//! seeding, soft delete/restore, snapshot synchronization on renames, and the
//! day/month/calendar aggregates. Storage is an injected
//! [`sea_orm::DatabaseConnection`]; HTTP and authentication live elsewhere.

pub use categories::Category;
pub use commands::{AddRecordCmd, NewCategoryCmd, UpdateCategoryCmd, UpdateRecordCmd};
pub use error::EngineError;
pub use kind::EntryKind;
pub use ops::{
    CategoryKey, CategoryUpdateOutcome, Engine, EngineBuilder, RecordListFilter, RecordPage,
    RecordRow,
};
pub use ops::{CalendarDay, CalendarSummary, DaySummary, MonthSummary};
pub use receipts::{NewReceipt, Receipt};
pub use records::Record;
pub use users::User;

pub mod budgets;
pub mod categories;
mod commands;
mod error;
mod kind;
pub mod receipts;
pub mod records;
pub mod users;
mod util;

mod ops;

type ResultEngine<T> = Result<T, EngineError>;
