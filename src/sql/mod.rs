//! Best-effort SQL preview rendering.
//!
//! This pass mirrors the operator graph as nested subquery text. It is
//! purely textual: nothing is validated against table data, and the output
//! may diverge from the evaluator's actual semantics (analyze, for one, has
//! no SQL equivalent at all). Failures are rendered inline as a SQL comment
//! rather than propagated, since the preview is advisory.

use ahash::AHashMap;
use itertools::Itertools;

use crate::canvas::{CanvasState, CompareOp, Condition, InputRole, OperatorKind, SortDirection};
use crate::error::SqlError;
use crate::graph::ExecutionGraph;

/// Renders the document as SQL text. Never fails: an empty canvas yields an
/// empty string and any internal error yields an explanatory comment.
pub fn generate_sql(state: &CanvasState) -> String {
    if state.operators.is_empty() {
        return String::new();
    }
    match try_generate(state) {
        Ok(sql) => sql,
        Err(e) => format!("-- Error generating SQL: {}", e),
    }
}

fn try_generate(state: &CanvasState) -> Result<String, SqlError> {
    let graph = ExecutionGraph::build(state);
    // A cyclic document cannot be rendered as nested subqueries.
    graph.execution_order()?;

    let sinks = graph.sinks();
    let mut subqueries: AHashMap<String, String> = AHashMap::new();
    let rendered: Vec<String> = sinks
        .iter()
        .map(|id| node_sql(state, id, &mut subqueries))
        .collect::<Result<_, _>>()?;

    if rendered.len() > 1 {
        // Multiple terminal operators combine through CTEs.
        let ctes = rendered
            .iter()
            .enumerate()
            .map(|(i, sql)| format!("output_{} AS ({})", i + 1, sql))
            .join(",\n");
        let union = (1..=rendered.len())
            .map(|i| format!("SELECT * FROM output_{}", i))
            .join("\nUNION ALL\n");
        Ok(format!("WITH {}\n{}", ctes, union))
    } else {
        Ok(rendered.into_iter().next().unwrap_or_default())
    }
}

fn node_sql(
    state: &CanvasState,
    node_id: &str,
    subqueries: &mut AHashMap<String, String>,
) -> Result<String, SqlError> {
    if let Some(cached) = subqueries.get(node_id) {
        return Ok(cached.clone());
    }

    let operator = state
        .operator(node_id)
        .ok_or_else(|| SqlError::OperatorNotFound(node_id.to_string()))?;

    let mut incoming: Vec<_> = state
        .connections
        .iter()
        .filter(|conn| conn.target_id == node_id)
        .collect();
    if matches!(operator.kind, OperatorKind::Join(_)) {
        // Put an explicitly-bound left input first.
        incoming.sort_by_key(|conn| match conn.target_role {
            Some(InputRole::Left) => 0,
            Some(InputRole::Right) => 2,
            None => 1,
        });
    }
    let input_sqls: Vec<String> = incoming
        .iter()
        .map(|conn| node_sql(state, &conn.source_id, subqueries))
        .collect::<Result<_, _>>()?;

    let sql = render_operator(operator.kind.clone(), node_id, &input_sqls)?;
    subqueries.insert(node_id.to_string(), sql.clone());
    Ok(sql)
}

fn render_operator(
    kind: OperatorKind,
    node_id: &str,
    inputs: &[String],
) -> Result<String, SqlError> {
    let require = |n: usize| {
        if inputs.len() < n {
            Err(SqlError::MissingInput {
                operator: format!("{} operator '{}'", kind_name(&kind), node_id),
                expected: n,
            })
        } else {
            Ok(())
        }
    };

    match &kind {
        OperatorKind::Source(config) => {
            let columns = if config.selected_columns.is_empty() {
                "*".to_string()
            } else {
                config.selected_columns.join(", ")
            };
            let table = config.table.as_deref().unwrap_or("table_name");
            Ok(format!("SELECT {} FROM {}", columns, table))
        }
        OperatorKind::Filter(config) => {
            require(1)?;
            let clause = if config.conditions.is_empty() {
                "1=1".to_string()
            } else {
                config.conditions.iter().map(render_condition).join(" AND ")
            };
            Ok(format!("SELECT * FROM ({}) t WHERE {}", inputs[0], clause))
        }
        OperatorKind::Join(config) => {
            require(2)?;
            let on = match (&config.left_key, &config.right_key) {
                (Some(l), Some(r)) => format!("a.{} = b.{}", l, r),
                _ => "a.id = b.id".to_string(),
            };
            Ok(format!(
                "SELECT * FROM ({}) a {} JOIN ({}) b ON {}",
                inputs[0],
                config.join_type.as_sql(),
                inputs[1],
                on
            ))
        }
        OperatorKind::Aggregate(config) => {
            require(1)?;
            let aggregates = if config.aggregations.is_empty() {
                "COUNT(*) AS count".to_string()
            } else {
                config
                    .aggregations
                    .iter()
                    .map(|agg| {
                        format!("{}({}) AS {}", agg.function.as_sql(), agg.field, agg.output_column())
                    })
                    .join(", ")
            };
            if config.group_by_fields.is_empty() {
                Ok(format!("SELECT {} FROM ({}) t", aggregates, inputs[0]))
            } else {
                let group = config.group_by_fields.join(", ");
                Ok(format!(
                    "SELECT {}, {} FROM ({}) t GROUP BY {}",
                    group, aggregates, inputs[0], group
                ))
            }
        }
        OperatorKind::Select(config) => {
            require(1)?;
            let columns = if config.selected_columns.is_empty() {
                "*".to_string()
            } else {
                config.selected_columns.join(", ")
            };
            Ok(format!("SELECT {} FROM ({}) t", columns, inputs[0]))
        }
        OperatorKind::Union(config) => {
            require(2)?;
            let keyword = if config.distinct { " UNION " } else { " UNION ALL " };
            Ok(inputs.iter().map(|sql| format!("({})", sql)).join(keyword))
        }
        OperatorKind::Sort(config) => {
            require(1)?;
            let order = if config.sort_fields.is_empty() {
                "id ASC".to_string()
            } else {
                config
                    .sort_fields
                    .iter()
                    .map(|f| {
                        let dir = match f.direction {
                            SortDirection::Asc => "ASC",
                            SortDirection::Desc => "DESC",
                        };
                        format!("{} {}", f.field, dir)
                    })
                    .join(", ")
            };
            Ok(format!("SELECT * FROM ({}) t ORDER BY {}", inputs[0], order))
        }
        OperatorKind::Limit(config) => {
            require(1)?;
            let limit = config.limit.filter(|n| *n > 0).unwrap_or(100);
            Ok(format!("SELECT * FROM ({}) t LIMIT {}", inputs[0], limit))
        }
        OperatorKind::Analyze(_) => Err(SqlError::NoSqlEquivalent("analyze".to_string())),
    }
}

fn render_condition(condition: &Condition) -> String {
    let field = &condition.field;
    let value = condition.value.as_str();
    match &condition.op {
        CompareOp::Like => format!("{} LIKE '%{}%'", field, escape(value)),
        CompareOp::NotLike => format!("{} NOT LIKE '%{}%'", field, escape(value)),
        CompareOp::In | CompareOp::NotIn => {
            let items = value.split(',').map(|v| literal(v.trim())).join(", ");
            format!("{} {} ({})", field, condition.op.symbol(), items)
        }
        op => format!("{} {} {}", field, op.symbol(), literal(value)),
    }
}

/// Numbers render bare, everything else as an escaped string literal.
fn literal(value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        value.to_string()
    } else {
        format!("'{}'", escape(value))
    }
}

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

fn kind_name(kind: &OperatorKind) -> &'static str {
    kind.name()
}
