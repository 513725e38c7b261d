//! The module contains the error the engine can throw.
//!
//! The variants follow the taxonomy of the request boundary: bad input,
//! unparseable dates, missing/foreign rows, duplicate categories, and the
//! catch-all storage failure.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("\"{0}\" already exists")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::InvalidFormat(a), Self::InvalidFormat(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
