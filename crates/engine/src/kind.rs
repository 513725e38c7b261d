use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Direction of money movement, shared by categories and records.
///
/// A record's kind is authoritative for aggregation; it normally matches its
/// category's kind but is never forced to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidArgument(format!(
                "type must be income or expense, got: {other}"
            ))),
        }
    }
}
