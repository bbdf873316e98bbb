//! # Pipewright - Visual Query Pipeline Engine
//!
//! **Pipewright** is the engine behind a canvas-style visual query builder: a
//! document of typed operators (sources, filters, joins, aggregates, ...)
//! wired together by connections, compiled into an execution graph and
//! evaluated into in-memory tables. The same document also renders to a SQL
//! preview, and documents can be persisted as named workflows with scheduled
//! automations on top.
//!
//! ## Core Workflow
//!
//! 1.  **Build or Load a Canvas**: Construct a [`canvas::CanvasState`]
//!     programmatically through its mutation API, deserialize one from JSON,
//!     or implement [`canvas::IntoCanvas`] for your own document format.
//! 2.  **Execute**: Hand the document to an [`exec::Executor`]. It orders the
//!     operator graph, rejects cycles, evaluates each operator once per pass
//!     and returns the terminal [`table::Table`].
//! 3.  **Preview**: Call [`sql::generate_sql`] for the equivalent SQL text.
//! 4.  **Persist**: Save the document as a workflow through a
//!     [`store::WorkflowStore`], optionally with automations attached.
//!
//! ## Quick Start
//!
//! ```rust
//! use pipewright::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut canvas = CanvasState::default();
//!     canvas.add_operator(Operator::new(
//!         "src",
//!         "Customers",
//!         OperatorKind::Source(SourceConfig {
//!             table: Some("customers".into()),
//!             ..Default::default()
//!         }),
//!     ))?;
//!     canvas.add_operator(Operator::new(
//!         "adults",
//!         "Adults only",
//!         OperatorKind::Filter(FilterConfig {
//!             conditions: vec![Condition {
//!                 field: "age".into(),
//!                 op: CompareOp::Gt,
//!                 value: "25".into(),
//!             }],
//!         }),
//!     ))?;
//!     canvas.connect(Connection::new("c1", "src", "adults"))?;
//!
//!     let executor = Executor::default();
//!     let table = executor.run(&canvas)?;
//!     println!("{} rows", table.row_count());
//!
//!     println!("{}", generate_sql(&canvas));
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod canvas;
pub mod error;
pub mod exec;
pub mod graph;
pub mod prelude;
pub mod source;
pub mod sql;
pub mod store;
pub mod table;
