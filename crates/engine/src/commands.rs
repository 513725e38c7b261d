//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. For updates, every field is
//! optional and absence means "leave unchanged".

use crate::{EntryKind, receipts::NewReceipt};

/// Create a category.
#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub kind: EntryKind,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort: i32,
    pub hidden: bool,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(kind: EntryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            icon: None,
            color: None,
            sort: 0,
            hidden: false,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: i32) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Update a category, possibly propagating a name/kind change into the
/// snapshots of referencing records.
///
/// `confirm` gates the propagation: a key change over live records is
/// rejected with a confirmation request unless it is set.
#[derive(Clone, Debug, Default)]
pub struct UpdateCategoryCmd {
    pub kind: Option<EntryKind>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort: Option<i32>,
    pub hidden: Option<bool>,
    pub confirm: bool,
}

impl UpdateCategoryCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: i32) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    #[must_use]
    pub fn confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }
}

/// Create a ledger record, optionally with receipt attachments.
///
/// `occur_at` stays textual here; the engine parses it with the multi-format
/// rule and rejects unknown shapes.
#[derive(Clone, Debug)]
pub struct AddRecordCmd {
    pub kind: EntryKind,
    pub amount_minor: i64,
    pub category_id: i64,
    pub occur_at: String,
    pub note: Option<String>,
    pub category_name_snapshot: Option<String>,
    pub receipts: Vec<NewReceipt>,
}

impl AddRecordCmd {
    #[must_use]
    pub fn new(
        kind: EntryKind,
        amount_minor: i64,
        category_id: i64,
        occur_at: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount_minor,
            category_id,
            occur_at: occur_at.into(),
            note: None,
            category_name_snapshot: None,
            receipts: Vec::new(),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.category_name_snapshot = Some(snapshot.into());
        self
    }

    #[must_use]
    pub fn receipt(mut self, receipt: NewReceipt) -> Self {
        self.receipts.push(receipt);
        self
    }

    #[must_use]
    pub fn receipts(mut self, receipts: Vec<NewReceipt>) -> Self {
        self.receipts = receipts;
        self
    }
}

/// Update a ledger record.
///
/// The updatable set is exactly {kind, amount_minor, category_id, note,
/// occur_at, category_name_snapshot}; hidden records must be restored first.
#[derive(Clone, Debug, Default)]
pub struct UpdateRecordCmd {
    pub kind: Option<EntryKind>,
    pub amount_minor: Option<i64>,
    pub category_id: Option<i64>,
    pub note: Option<String>,
    pub occur_at: Option<String>,
    pub category_name_snapshot: Option<String>,
}

impl UpdateRecordCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn occur_at(mut self, occur_at: impl Into<String>) -> Self {
        self.occur_at = Some(occur_at.into());
        self
    }

    #[must_use]
    pub fn snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.category_name_snapshot = Some(snapshot.into());
        self
    }
}
