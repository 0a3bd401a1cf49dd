use std::collections::BTreeMap;

use serde::Serialize;

/// Column sentinel for a Difference describing a row absent from one side.
pub const MISSING_ROW_COLUMN: &str = "__missing__";

/// Display label the sentinel column is reported under.
pub const MISSING_ROW_LABEL: &str = "Row missing";

/// Default key column for policy exports.
pub const DEFAULT_KEY_FIELD: &str = "POLICY_NO";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single loaded row. `fields` holds every column, the key included under
/// its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub fields: BTreeMap<String, String>,
}

impl Row {
    /// Value of `column`, empty text when the row has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Rows from one source, sorted ascending by key.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source label used in messages (file name).
    pub source: String,
    /// Canonical key column name.
    pub key_field: String,
    /// Header columns in file order, key column renamed to `key_field`.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Differences
// ---------------------------------------------------------------------------

/// Kind names the side where the row is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    ValueMismatch,
    MissingInA,
    MissingInB,
}

impl DifferenceKind {
    /// Human readable label for tables and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ValueMismatch => "Value mismatch",
            Self::MissingInA => "Missing row in file 1",
            Self::MissingInB => "Missing row in file 2",
        }
    }
}

impl std::fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValueMismatch => write!(f, "value_mismatch"),
            Self::MissingInA => write!(f, "missing_in_a"),
            Self::MissingInB => write!(f, "missing_in_b"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    pub key: String,
    /// Column name, or [`MISSING_ROW_COLUMN`] for an absent row.
    pub column: String,
    pub value_a: String,
    pub value_b: String,
    pub kind: DifferenceKind,
}

impl Difference {
    pub fn is_missing_row(&self) -> bool {
        self.column == MISSING_ROW_COLUMN
    }

    /// Column name for display, with the sentinel replaced by its label.
    pub fn field_label(&self) -> &str {
        if self.is_missing_row() {
            MISSING_ROW_LABEL
        } else {
            &self.column
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Per-field discrepancy counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub field: String,
    pub total: usize,
    pub value_mismatches: usize,
    pub missing_in_a: usize,
    pub missing_in_b: usize,
}

/// Difference counts per kind across a whole comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTally {
    pub value_mismatches: usize,
    pub missing_in_a: usize,
    pub missing_in_b: usize,
}

impl KindTally {
    pub fn total(&self) -> usize {
        self.value_mismatches + self.missing_in_a + self.missing_in_b
    }
}
