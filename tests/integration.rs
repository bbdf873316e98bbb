//! End-to-end tests: a persisted JSON document through execution, preview
//! and storage.
mod common;

use pipewright::exec::Executor;
use pipewright::prelude::*;
use pipewright::table::Table;

const CANVAS_JSON: &str = r#"{
    "operators": [
        {
            "id": "src",
            "name": "Customers",
            "type": "source",
            "table": "customers",
            "selectedColumns": []
        },
        {
            "id": "adults",
            "name": "Adults",
            "type": "filter",
            "conditions": [
                { "field": "age", "operator": ">=", "value": "25" }
            ]
        },
        {
            "id": "top",
            "name": "Top 2",
            "type": "limit",
            "limit": 2,
            "direction": "top"
        }
    ],
    "connections": [
        { "id": "c1", "sourceId": "src", "targetId": "adults" },
        { "id": "c2", "sourceId": "adults", "targetId": "top" }
    ]
}"#;

#[test]
fn persisted_document_executes_end_to_end() {
    let canvas: CanvasState = serde_json::from_str(CANVAS_JSON).unwrap();
    assert_eq!(canvas.operators.len(), 3);

    let table = Executor::default().run(&canvas).unwrap();
    // Four customers pass the filter; the limit keeps the first two.
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        Table::cell(&table.rows[0], "name").to_string(),
        "John Doe"
    );
    assert_eq!(
        Table::cell(&table.rows[1], "name").to_string(),
        "Jane Smith"
    );
}

#[test]
fn persisted_document_round_trips_through_serde() {
    let canvas: CanvasState = serde_json::from_str(CANVAS_JSON).unwrap();
    let json = serde_json::to_string(&canvas).unwrap();
    let back: CanvasState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, canvas);
}

#[test]
fn preview_and_execution_agree_on_the_pipeline_shape() {
    let canvas: CanvasState = serde_json::from_str(CANVAS_JSON).unwrap();
    let sql = generate_sql(&canvas);
    assert_eq!(
        sql,
        "SELECT * FROM (SELECT * FROM (SELECT * FROM customers) t WHERE age >= 25) t LIMIT 2"
    );
}

#[test]
fn join_document_with_port_roles_binds_sides_correctly() {
    let json = r#"{
        "operators": [
            { "id": "c", "name": "Customers", "type": "source", "table": "customers" },
            { "id": "o", "name": "Orders", "type": "source", "table": "orders" },
            {
                "id": "j", "name": "Join", "type": "join",
                "joinType": "INNER", "leftKey": "id", "rightKey": "customer_id"
            }
        ],
        "connections": [
            { "id": "e1", "sourceId": "o", "targetId": "j", "targetPortId": "right" },
            { "id": "e2", "sourceId": "c", "targetId": "j", "targetPortId": "left" }
        ]
    }"#;
    let canvas: CanvasState = serde_json::from_str(json).unwrap();
    let table = Executor::default().run(&canvas).unwrap();
    // Roles override connection order: customers are the left side.
    assert!(table.columns.contains(&"left_name".to_string()));
    assert!(table.columns.contains(&"right_product".to_string()));
    assert_eq!(table.row_count(), 4);
}

#[test]
fn unknown_operator_type_is_rejected_at_parse_time() {
    let json = r#"{
        "operators": [
            { "id": "x", "name": "Mystery", "type": "teleport" }
        ],
        "connections": []
    }"#;
    assert!(serde_json::from_str::<CanvasState>(json).is_err());
}
