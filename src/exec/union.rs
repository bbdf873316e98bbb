//! Multi-way union with column reconciliation.

use ahash::AHashSet;

use crate::canvas::UnionConfig;
use crate::table::{Cell, Row, Table};

/// Concatenates the inputs over the superset of their columns (first-seen
/// order), filling missing fields with Null. With `distinct` set, rows are
/// deduplicated by full structural equality after that normalization.
pub fn union(config: &UnionConfig, inputs: Vec<Table>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    let mut seen = AHashSet::new();
    for input in &inputs {
        for col in &input.columns {
            if seen.insert(col.clone()) {
                columns.push(col.clone());
            }
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut dedupe: AHashSet<String> = AHashSet::new();
    for input in inputs {
        for row in input.rows {
            let mut normalized = Row::default();
            for col in &columns {
                normalized.insert(col.clone(), Table::cell(&row, col).clone());
            }
            if config.distinct {
                let fingerprint = row_fingerprint(&columns, &normalized);
                if !dedupe.insert(fingerprint) {
                    continue;
                }
            }
            rows.push(normalized);
        }
    }

    Table::new(columns, rows)
}

// Serializes the cells in column order, so equality is structural and
// independent of map iteration order.
fn row_fingerprint(columns: &[String], row: &Row) -> String {
    let values: Vec<&Cell> = columns.iter().map(|col| Table::cell(row, col)).collect();
    serde_json::to_string(&values).unwrap_or_default()
}
