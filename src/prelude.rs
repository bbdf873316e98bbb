//! Prelude module for convenient imports
//!
//! Re-exports the types needed for the common build-execute-preview loop.
//! Import this module to get access to the core functionality without having
//! to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use pipewright::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/canvas.json")?;
//! let canvas: CanvasState = serde_json::from_str(&json)?;
//!
//! let executor = Executor::default();
//! let table = executor.run(&canvas)?;
//! println!("{} rows, SQL:\n{}", table.row_count(), generate_sql(&canvas));
//! # Ok(())
//! # }
//! ```

// Canvas document model
pub use crate::canvas::{
    CanvasState, CompareOp, Condition, Connection, FilterConfig, InputRole, JoinConfig,
    JoinType, Operator, OperatorKind, SourceConfig,
};

// Execution
pub use crate::exec::Executor;
pub use crate::graph::ExecutionGraph;
pub use crate::table::{Cell, Row, Table};

// SQL preview
pub use crate::sql::generate_sql;

// Persistence
pub use crate::store::{SavedWorkflow, WorkflowStore};

// Error types
pub use crate::error::{CanvasError, ExecuteError, GraphError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
