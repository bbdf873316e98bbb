//! Group-by aggregation.

use ahash::AHashMap;
use tracing::warn;

use crate::canvas::{AggregateConfig, AggregateFn};
use crate::table::{Cell, Row, Table};

/// Partitions rows by the concatenated group-by values (first-seen order)
/// and computes one value per aggregation per partition.
///
/// Numeric leniency follows the per-row policy: SUM and AVG coerce, treating
/// non-numeric cells as 0; MIN and MAX scan only the cells that coerce and
/// yield Null when none do.
pub fn aggregate(config: &AggregateConfig, input: Table) -> Table {
    if config.group_by_fields.is_empty() {
        warn!("aggregate operator has no group-by fields configured, passing input through");
        return input;
    }
    if config.aggregations.is_empty() {
        warn!("aggregate operator has no aggregations configured, passing input through");
        return input;
    }

    // Order-preserving partitioning.
    let mut partitions: Vec<Vec<&Row>> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();
    for row in &input.rows {
        let key = config
            .group_by_fields
            .iter()
            .map(|field| Table::cell(row, field).key_string())
            .collect::<Vec<_>>()
            .join("||");
        match index.get(&key) {
            Some(&i) => partitions[i].push(row),
            None => {
                index.insert(key, partitions.len());
                partitions.push(vec![row]);
            }
        }
    }

    let columns: Vec<String> = config
        .group_by_fields
        .iter()
        .cloned()
        .chain(config.aggregations.iter().map(|agg| agg.output_column()))
        .collect();

    let rows = partitions
        .into_iter()
        .map(|partition| {
            let mut out = Row::default();
            let first = partition[0];
            for field in &config.group_by_fields {
                out.insert(field.clone(), Table::cell(first, field).clone());
            }
            for agg in &config.aggregations {
                out.insert(agg.output_column(), apply(agg.function, &agg.field, &partition));
            }
            out
        })
        .collect();

    Table::new(columns, rows)
}

fn apply(function: AggregateFn, field: &str, partition: &[&Row]) -> Cell {
    match function {
        AggregateFn::Count => Cell::Number(partition.len() as f64),
        AggregateFn::Sum => Cell::Number(coerced_sum(field, partition)),
        AggregateFn::Avg => Cell::Number(coerced_sum(field, partition) / partition.len() as f64),
        AggregateFn::Min => numeric_values(field, partition)
            .reduce(f64::min)
            .map_or(Cell::Null, Cell::Number),
        AggregateFn::Max => numeric_values(field, partition)
            .reduce(f64::max)
            .map_or(Cell::Null, Cell::Number),
    }
}

fn coerced_sum(field: &str, partition: &[&Row]) -> f64 {
    partition
        .iter()
        .map(|row| Table::cell(row, field).as_number().unwrap_or(0.0))
        .sum()
}

fn numeric_values<'a>(field: &'a str, partition: &'a [&Row]) -> impl Iterator<Item = f64> + 'a {
    partition
        .iter()
        .filter_map(move |row| Table::cell(row, field).as_number())
}
