//! The tabular value type flowing between operators.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

mod cell;

pub use cell::Cell;

/// A row maps column names to cells. Column order lives on the [`Table`].
pub type Row = AHashMap<String, Cell>;

/// An in-memory table produced by evaluating an operator.
///
/// Tables are ephemeral: they are recomputed on every execution pass and
/// cached only within that pass. Columns carry the display order; rows may
/// omit columns, in which case the value reads as [`Cell::Null`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: None,
            columns,
            rows,
        }
    }

    pub fn named(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: Some(name.into()),
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell lookup with the missing-column-is-null convention.
    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Cell {
        row.get(column).unwrap_or(&Cell::Null)
    }

    /// Replaces the rows while keeping name and column order. Used by
    /// operators that only drop or reorder rows (filter, sort, limit).
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Convenience for building rows in tests and sample data.
#[macro_export]
macro_rules! row {
    ($($col:expr => $val:expr),* $(,)?) => {{
        let mut r = $crate::table::Row::default();
        $( r.insert($col.to_string(), $crate::table::Cell::from($val)); )*
        r
    }};
}
