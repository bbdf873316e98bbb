//! Common test utilities for building canvas documents.
use pipewright::canvas::*;

/// A source operator reading the named sample table, with an optional
/// projection.
#[allow(dead_code)]
pub fn source(id: &str, table: &str, selected: &[&str]) -> Operator {
    Operator::new(
        id,
        format!("Source {}", table),
        OperatorKind::Source(SourceConfig {
            table: Some(table.to_string()),
            available_columns: Vec::new(),
            selected_columns: selected.iter().map(|c| c.to_string()).collect(),
        }),
    )
}

/// A filter operator with a single condition.
#[allow(dead_code)]
pub fn filter(id: &str, field: &str, op: CompareOp, value: &str) -> Operator {
    Operator::new(
        id,
        format!("Filter {}", field),
        OperatorKind::Filter(FilterConfig {
            conditions: vec![Condition {
                field: field.to_string(),
                op,
                value: value.to_string(),
            }],
        }),
    )
}

#[allow(dead_code)]
pub fn join(id: &str, join_type: JoinType, left_key: &str, right_key: &str) -> Operator {
    Operator::new(
        id,
        "Join",
        OperatorKind::Join(JoinConfig {
            join_type,
            left_key: Some(left_key.to_string()),
            right_key: Some(right_key.to_string()),
        }),
    )
}

#[allow(dead_code)]
pub fn connect(state: &mut CanvasState, id: &str, from: &str, to: &str) {
    state
        .connect(Connection::new(id, from, to))
        .unwrap_or_else(|e| panic!("connection {} rejected: {}", id, e));
}

#[allow(dead_code)]
pub fn connect_role(state: &mut CanvasState, id: &str, from: &str, to: &str, role: InputRole) {
    state
        .connect(Connection::new(id, from, to).with_role(role))
        .unwrap_or_else(|e| panic!("connection {} rejected: {}", id, e));
}

/// customers -> filter(age > 30): a minimal linear pipeline, laid out
/// left to right as an editor would place it.
#[allow(dead_code)]
pub fn simple_pipeline() -> CanvasState {
    let mut state = CanvasState::default();
    state
        .add_operator(source("src", "customers", &[]).at(40.0, 120.0))
        .unwrap();
    state
        .add_operator(filter("adults", "age", CompareOp::Gt, "30").at(280.0, 120.0))
        .unwrap();
    connect(&mut state, "c1", "src", "adults");
    state
}

/// customers JOIN orders on id = customer_id, with explicit port roles.
#[allow(dead_code)]
pub fn join_pipeline(join_type: JoinType) -> CanvasState {
    let mut state = CanvasState::default();
    state
        .add_operator(source("customers", "customers", &[]))
        .unwrap();
    state.add_operator(source("orders", "orders", &[])).unwrap();
    state
        .add_operator(join("joined", join_type, "id", "customer_id"))
        .unwrap();
    connect_role(&mut state, "c1", "customers", "joined", InputRole::Left);
    connect_role(&mut state, "c2", "orders", "joined", InputRole::Right);
    state
}
