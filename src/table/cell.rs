use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single tabular value flowing between operators.
///
/// Rows are dynamically typed in the canvas document, so the coercion rules
/// that the filter and aggregate paths rely on live here, explicit and
/// testable, instead of being scattered through the evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

// Manual implementation to handle f64
impl Eq for Cell {}

// Manual implementation to handle f64 by hashing its bits
impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Cell::Number(n) => n.to_bits().hash(state),
            Cell::Bool(b) => b.hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Null => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Null => write!(f, "null"),
        }
    }
}

impl Cell {
    /// Numeric view of the cell. Text parses, booleans and nulls do not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Bool(_) | Cell::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// String form used for join-key matching and group-by keys. Matches
    /// `Display`, so `Number(1.0)` and `Text("1")` coerce to the same key.
    pub fn key_string(&self) -> String {
        self.to_string()
    }

    /// Deterministic total order used by the sort operator.
    ///
    /// Values of the same kind compare naturally; mixed kinds fall back to a
    /// fixed rank (null < bool < number < text) so sorting a ragged column
    /// never panics and always produces the same order.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a.total_cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Null, Cell::Null) => Ordering::Equal,
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Null => 0,
            Cell::Bool(_) => 1,
            Cell::Number(_) => 2,
            Cell::Text(_) => 3,
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_parses_text() {
        assert_eq!(Cell::Text("42.5".into()).as_number(), Some(42.5));
        assert_eq!(Cell::Text(" 7 ".into()).as_number(), Some(7.0));
        assert_eq!(Cell::Text("abc".into()).as_number(), None);
        assert_eq!(Cell::Null.as_number(), None);
    }

    #[test]
    fn key_string_unifies_number_and_text() {
        assert_eq!(Cell::Number(1.0).key_string(), Cell::Text("1".into()).key_string());
    }

    #[test]
    fn compare_is_total_over_mixed_kinds() {
        let mut cells = vec![
            Cell::Text("b".into()),
            Cell::Null,
            Cell::Number(2.0),
            Cell::Bool(true),
            Cell::Number(-1.0),
        ];
        cells.sort_by(|a, b| a.compare(b));
        assert_eq!(
            cells,
            vec![
                Cell::Null,
                Cell::Bool(true),
                Cell::Number(-1.0),
                Cell::Number(2.0),
                Cell::Text("b".into()),
            ]
        );
    }
}
