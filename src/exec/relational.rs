//! Row-wise operators: filter, select, sort, limit.

use std::cmp::Ordering;

use tracing::warn;

use crate::canvas::{
    CompareOp, Condition, FilterConfig, LimitConfig, LimitDirection, SelectConfig, SortConfig,
    SortDirection,
};
use crate::table::{Cell, Row, Table};

/// Keeps each row only if every condition holds.
pub fn filter(config: &FilterConfig, input: Table) -> Table {
    if config.conditions.is_empty() {
        return input;
    }
    let rows = input
        .rows
        .iter()
        .filter(|row| config.conditions.iter().all(|c| condition_holds(c, row)))
        .cloned()
        .collect();
    input.with_rows(rows)
}

fn condition_holds(condition: &Condition, row: &Row) -> bool {
    let cell = Table::cell(row, &condition.field);
    let value = condition.value.as_str();
    match &condition.op {
        CompareOp::Eq => coerced_cmp(cell, value) == Ordering::Equal,
        CompareOp::Ne => coerced_cmp(cell, value) != Ordering::Equal,
        CompareOp::Gt => coerced_cmp(cell, value) == Ordering::Greater,
        CompareOp::Lt => coerced_cmp(cell, value) == Ordering::Less,
        CompareOp::Ge => coerced_cmp(cell, value) != Ordering::Less,
        CompareOp::Le => coerced_cmp(cell, value) != Ordering::Greater,
        CompareOp::Like => contains_ci(cell, value),
        CompareOp::NotLike => !contains_ci(cell, value),
        CompareOp::In => in_list(cell, value),
        CompareOp::NotIn => !in_list(cell, value),
        CompareOp::Unknown(symbol) => {
            warn!(operator = %symbol, field = %condition.field,
                  "unknown filter operator, condition treated as always-true");
            true
        }
    }
}

/// Compares a cell against the condition's configured value, numerically
/// when both sides coerce to numbers, as strings otherwise.
fn coerced_cmp(cell: &Cell, value: &str) -> Ordering {
    if let (Some(a), Ok(b)) = (cell.as_number(), value.trim().parse::<f64>()) {
        return a.total_cmp(&b);
    }
    cell.key_string().cmp(&value.to_string())
}

fn contains_ci(cell: &Cell, value: &str) -> bool {
    cell.key_string()
        .to_lowercase()
        .contains(&value.to_lowercase())
}

fn in_list(cell: &Cell, value: &str) -> bool {
    let needle = cell.key_string();
    value.split(',').any(|item| item.trim() == needle)
}

/// Projects to the listed columns that exist in the input, in list order.
/// An empty selection passes the input through unchanged.
pub fn select(config: &SelectConfig, input: Table) -> Table {
    if config.selected_columns.is_empty() {
        warn!("select operator has no columns configured, passing input through");
        return input;
    }
    project(&config.selected_columns, input)
}

/// Shared projection used by select and by source column selection.
pub fn project(columns: &[String], input: Table) -> Table {
    let kept: Vec<String> = columns
        .iter()
        .filter(|col| input.columns.contains(col))
        .cloned()
        .collect();
    let rows = input
        .rows
        .into_iter()
        .map(|mut row| {
            let mut projected = Row::default();
            for col in &kept {
                if let Some(cell) = row.remove(col) {
                    projected.insert(col.clone(), cell);
                }
            }
            projected
        })
        .collect();
    Table {
        name: input.name,
        columns: kept,
        rows,
    }
}

/// Stable multi-key sort: first field decides, ties fall through to the
/// next, and fully tied rows keep their original relative order.
pub fn sort(config: &SortConfig, input: Table) -> Table {
    if config.sort_fields.is_empty() {
        warn!("sort operator has no sort fields configured, passing input through");
        return input;
    }
    let mut rows = input.rows.clone();
    rows.sort_by(|a, b| {
        for sort_field in &config.sort_fields {
            let lhs = Table::cell(a, &sort_field.field);
            let rhs = Table::cell(b, &sort_field.field);
            let ordering = match sort_field.direction {
                SortDirection::Asc => lhs.compare(rhs),
                SortDirection::Desc => rhs.compare(lhs),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
    input.with_rows(rows)
}

/// First or last `limit` rows; non-positive or absent limits pass through.
pub fn limit(config: &LimitConfig, input: Table) -> Table {
    let Some(n) = config.limit.filter(|n| *n > 0) else {
        warn!("limit operator has no positive limit configured, passing input through");
        return input;
    };
    let n = n as usize;
    let rows = match config.direction {
        LimitDirection::Top => input.rows.iter().take(n).cloned().collect(),
        LimitDirection::Bottom => {
            let skip = input.rows.len().saturating_sub(n);
            input.rows.iter().skip(skip).cloned().collect()
        }
    };
    input.with_rows(rows)
}
