//! Tests for the evaluation engine and its operator semantics.
mod common;
use common::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pipewright::analysis::HeuristicAnalyzer;
use pipewright::canvas::*;
use pipewright::error::{ExecuteError, GraphError};
use pipewright::exec::Executor;
use pipewright::source::{SampleProvider, TableProvider};
use pipewright::table::{Cell, Table};

#[test]
fn filter_keeps_only_matching_rows() {
    let state = simple_pipeline();
    let table = Executor::default().run(&state).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(
        Table::cell(&table.rows[0], "name"),
        &Cell::Text("Bob Williams".into())
    );
}

#[test]
fn evaluate_returns_an_intermediate_result() {
    let state = simple_pipeline();
    let table = Executor::default().evaluate(&state, "src").unwrap();
    assert_eq!(table.row_count(), 5);
}

#[test]
fn evaluate_unknown_operator_fails() {
    let state = simple_pipeline();
    assert!(matches!(
        Executor::default().evaluate(&state, "ghost"),
        Err(ExecuteError::OperatorNotFound(_))
    ));
}

#[test]
fn inner_join_emits_one_row_per_match() {
    let state = join_pipeline(JoinType::Inner);
    let table = Executor::default().run(&state).unwrap();
    // Customer 1 has two orders, customers 2 and 3 one each.
    assert_eq!(table.row_count(), 4);
    assert!(table.columns.contains(&"left_name".to_string()));
    assert!(table.columns.contains(&"right_product".to_string()));
}

#[test]
fn left_join_pads_unmatched_rows_with_null() {
    let state = join_pipeline(JoinType::Left);
    let table = Executor::default().run(&state).unwrap();
    // 4 matches plus customers 4 and 5 without orders.
    assert_eq!(table.row_count(), 6);
    let unmatched: Vec<_> = table
        .rows
        .iter()
        .filter(|row| Table::cell(row, "right_product").is_null())
        .collect();
    assert_eq!(unmatched.len(), 2);
}

#[test]
fn join_without_keys_fails() {
    let mut state = CanvasState::default();
    state.add_operator(source("a", "customers", &[])).unwrap();
    state.add_operator(source("b", "orders", &[])).unwrap();
    state
        .add_operator(Operator::new(
            "j",
            "Join",
            OperatorKind::Join(JoinConfig::default()),
        ))
        .unwrap();
    connect_role(&mut state, "c1", "a", "j", InputRole::Left);
    connect_role(&mut state, "c2", "b", "j", InputRole::Right);
    assert!(matches!(
        Executor::default().run(&state),
        Err(ExecuteError::MissingJoinKey(_))
    ));
}

#[test]
fn aggregate_sums_per_group() {
    let mut state = CanvasState::default();
    state.add_operator(source("orders", "orders", &[])).unwrap();
    state
        .add_operator(Operator::new(
            "totals",
            "Totals",
            OperatorKind::Aggregate(AggregateConfig {
                group_by_fields: vec!["customer_id".into()],
                aggregations: vec![Aggregation {
                    field: "amount".into(),
                    function: AggregateFn::Sum,
                    alias: None,
                }],
            }),
        ))
        .unwrap();
    connect(&mut state, "c1", "orders", "totals");

    let table = Executor::default().run(&state).unwrap();
    assert_eq!(table.columns, vec!["customer_id", "sum_amount"]);
    assert_eq!(table.row_count(), 3);
    // Groups keep first-seen order, so customer 1 comes first.
    assert_eq!(
        Table::cell(&table.rows[0], "sum_amount"),
        &Cell::Number(1328.0)
    );
}

#[test]
fn union_distinct_collapses_duplicate_rows() {
    let mut state = CanvasState::default();
    state
        .add_operator(source("a", "customers", &["country"]))
        .unwrap();
    state
        .add_operator(source("b", "customers", &["country"]))
        .unwrap();
    state
        .add_operator(Operator::new(
            "u",
            "Union",
            OperatorKind::Union(UnionConfig { distinct: true }),
        ))
        .unwrap();
    connect(&mut state, "c1", "a", "u");
    connect(&mut state, "c2", "b", "u");

    let table = Executor::default().run(&state).unwrap();
    // Five customers over four countries, doubled, deduplicated.
    assert_eq!(table.row_count(), 4);
}

#[test]
fn union_distinct_over_identical_inputs_keeps_each_row_once() {
    let mut state = CanvasState::default();
    state.add_operator(source("a", "feedback", &[])).unwrap();
    state.add_operator(source("b", "feedback", &[])).unwrap();
    state
        .add_operator(Operator::new(
            "u",
            "Union",
            OperatorKind::Union(UnionConfig { distinct: true }),
        ))
        .unwrap();
    connect(&mut state, "c1", "a", "u");
    connect(&mut state, "c2", "b", "u");

    let table = Executor::default().run(&state).unwrap();
    assert_eq!(table.row_count(), 3);
}

#[test]
fn sort_orders_by_multiple_keys() {
    let mut state = CanvasState::default();
    state.add_operator(source("src", "customers", &[])).unwrap();
    state
        .add_operator(Operator::new(
            "sorted",
            "Sorted",
            OperatorKind::Sort(SortConfig {
                sort_fields: vec![
                    SortField {
                        field: "country".into(),
                        direction: SortDirection::Asc,
                    },
                    SortField {
                        field: "age".into(),
                        direction: SortDirection::Desc,
                    },
                ],
            }),
        ))
        .unwrap();
    connect(&mut state, "c1", "src", "sorted");

    let table = Executor::default().run(&state).unwrap();
    let names: Vec<String> = table
        .rows
        .iter()
        .map(|row| Table::cell(row, "name").to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Bob Williams",  // France
            "Charlie Brown", // Japan
            "Alice Johnson", // UK
            "John Doe",      // USA, age 30
            "Jane Smith",    // USA, age 25
        ]
    );
}

#[test]
fn limit_bottom_keeps_the_tail() {
    let mut state = CanvasState::default();
    state.add_operator(source("src", "customers", &[])).unwrap();
    state
        .add_operator(Operator::new(
            "tail",
            "Tail",
            OperatorKind::Limit(LimitConfig {
                limit: Some(2),
                direction: LimitDirection::Bottom,
            }),
        ))
        .unwrap();
    connect(&mut state, "c1", "src", "tail");

    let table = Executor::default().run(&state).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        Table::cell(&table.rows[0], "name"),
        &Cell::Text("Bob Williams".into())
    );
}

#[test]
fn analyze_appends_a_result_column() {
    let mut state = CanvasState::default();
    state.add_operator(source("fb", "feedback", &[])).unwrap();
    state
        .add_operator(Operator::new(
            "mood",
            "Sentiment",
            OperatorKind::Analyze(AnalyzeConfig {
                analysis_type: Some(AnalysisType::Sentiment),
                text_field: Some("comment".into()),
            }),
        ))
        .unwrap();
    connect(&mut state, "c1", "fb", "mood");

    let table = Executor::default().run(&state).unwrap();
    assert!(table.columns.contains(&"sentiment_result".to_string()));
    assert_eq!(
        Table::cell(&table.rows[0], "sentiment_result"),
        &Cell::Text("Positive".into())
    );
    assert_eq!(
        Table::cell(&table.rows[2], "sentiment_result"),
        &Cell::Text("Negative".into())
    );
}

#[test]
fn missing_input_is_an_error() {
    let mut state = CanvasState::default();
    state
        .add_operator(filter("lonely", "age", CompareOp::Gt, "30"))
        .unwrap();
    assert!(matches!(
        Executor::default().run(&state),
        Err(ExecuteError::MissingInput { expected: 1, .. })
    ));
}

#[test]
fn empty_canvas_is_an_error() {
    assert!(matches!(
        Executor::default().run(&CanvasState::default()),
        Err(ExecuteError::EmptyCanvas)
    ));
}

#[test]
fn cycle_aborts_the_whole_pass() {
    let mut state = CanvasState::default();
    state.add_operator(source("a", "customers", &[])).unwrap();
    state
        .add_operator(filter("b", "age", CompareOp::Gt, "0"))
        .unwrap();
    // Bypass document validation to force a cyclic graph.
    state.connections.push(Connection::new("c1", "a", "b"));
    state.connections.push(Connection::new("c2", "b", "a"));
    assert!(matches!(
        Executor::default().run(&state),
        Err(ExecuteError::Graph(GraphError::CycleDetected(_)))
    ));
}

/// Delegates to the sample provider while counting fetches.
struct CountingProvider {
    inner: SampleProvider,
    fetches: Arc<AtomicUsize>,
}

impl TableProvider for CountingProvider {
    fn fetch(&self, operator_id: &str, config: &SourceConfig) -> Result<Table, ExecuteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(operator_id, config)
    }
}

#[test]
fn shared_upstream_is_evaluated_once_per_pass() {
    // Diamond: one source feeding two filters that meet in a union.
    let mut state = CanvasState::default();
    state.add_operator(source("src", "customers", &[])).unwrap();
    state
        .add_operator(filter("young", "age", CompareOp::Lt, "27"))
        .unwrap();
    state
        .add_operator(filter("old", "age", CompareOp::Ge, "27"))
        .unwrap();
    state
        .add_operator(Operator::new(
            "u",
            "Union",
            OperatorKind::Union(UnionConfig::default()),
        ))
        .unwrap();
    connect(&mut state, "c1", "src", "young");
    connect(&mut state, "c2", "src", "old");
    connect(&mut state, "c3", "young", "u");
    connect(&mut state, "c4", "old", "u");

    let fetches = Arc::new(AtomicUsize::new(0));
    let executor = Executor::new(
        Box::new(CountingProvider {
            inner: SampleProvider::new(),
            fetches: Arc::clone(&fetches),
        }),
        Box::new(HeuristicAnalyzer::new()),
    );

    let table = executor.run(&state).unwrap();
    assert_eq!(table.row_count(), 5);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    // A second pass starts cold: no caching across runs.
    executor.run(&state).unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}
