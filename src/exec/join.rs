//! Hash join over two input tables.

use ahash::AHashMap;

use crate::canvas::{JoinConfig, JoinType};
use crate::error::ExecuteError;
use crate::table::{Cell, Row, Table};

/// Joins `left` and `right` on string-coerced key equality.
///
/// Output columns are always `left_`/`right_` prefixed so the two sides can
/// never collide. Unmatched sides are filled with nulls according to the
/// join type; FULL is the LEFT result plus right rows that matched nothing,
/// so matched pairs are never duplicated.
pub fn join(
    operator_id: &str,
    config: &JoinConfig,
    left: Table,
    right: Table,
) -> Result<Table, ExecuteError> {
    let (Some(left_key), Some(right_key)) = (&config.left_key, &config.right_key) else {
        return Err(ExecuteError::MissingJoinKey(operator_id.to_string()));
    };

    // Index the right side once for constant-time probes.
    let mut right_index: AHashMap<String, Vec<usize>> = AHashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        let key = Table::cell(row, right_key).key_string();
        right_index.entry(key).or_default().push(i);
    }

    let columns: Vec<String> = left
        .columns
        .iter()
        .map(|c| format!("left_{}", c))
        .chain(right.columns.iter().map(|c| format!("right_{}", c)))
        .collect();

    let mut rows: Vec<Row> = Vec::new();
    match config.join_type {
        JoinType::Inner | JoinType::Left | JoinType::Full => {
            for left_row in &left.rows {
                let key = Table::cell(left_row, left_key).key_string();
                match right_index.get(&key) {
                    Some(matches) => {
                        for &i in matches {
                            rows.push(combined(&left, Some(left_row), &right, Some(&right.rows[i])));
                        }
                    }
                    None if config.join_type != JoinType::Inner => {
                        rows.push(combined(&left, Some(left_row), &right, None));
                    }
                    None => {}
                }
            }
            if config.join_type == JoinType::Full {
                // Right rows that matched no left key.
                let left_keys: ahash::AHashSet<String> = left
                    .rows
                    .iter()
                    .map(|row| Table::cell(row, left_key).key_string())
                    .collect();
                for right_row in &right.rows {
                    let key = Table::cell(right_row, right_key).key_string();
                    if !left_keys.contains(&key) {
                        rows.push(combined(&left, None, &right, Some(right_row)));
                    }
                }
            }
        }
        JoinType::Right => {
            // Probe the other way so every right row appears at least once.
            let mut left_index: AHashMap<String, Vec<usize>> = AHashMap::new();
            for (i, row) in left.rows.iter().enumerate() {
                let key = Table::cell(row, left_key).key_string();
                left_index.entry(key).or_default().push(i);
            }
            for right_row in &right.rows {
                let key = Table::cell(right_row, right_key).key_string();
                match left_index.get(&key) {
                    Some(matches) => {
                        for &i in matches {
                            rows.push(combined(&left, Some(&left.rows[i]), &right, Some(right_row)));
                        }
                    }
                    None => rows.push(combined(&left, None, &right, Some(right_row))),
                }
            }
        }
    }

    Ok(Table::new(columns, rows))
}

fn combined(left: &Table, left_row: Option<&Row>, right: &Table, right_row: Option<&Row>) -> Row {
    let mut row = Row::default();
    for col in &left.columns {
        let cell = left_row.map_or(Cell::Null, |r| Table::cell(r, col).clone());
        row.insert(format!("left_{}", col), cell);
    }
    for col in &right.columns {
        let cell = right_row.map_or(Cell::Null, |r| Table::cell(r, col).clone());
        row.insert(format!("right_{}", col), cell);
    }
    row
}
