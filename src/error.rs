use thiserror::Error;

/// Errors raised while mutating the canvas document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Cannot connect operator '{0}' to itself")]
    SelfLoop(String),

    #[error("A connection from '{source_id}' to '{target_id}' already exists")]
    DuplicateConnection { source_id: String, target_id: String },

    #[error("Connecting '{source_id}' to '{target_id}' would create a cycle")]
    WouldCreateCycle { source_id: String, target_id: String },

    #[error("Operator '{0}' does not exist on the canvas")]
    OperatorNotFound(String),

    #[error("Operator id '{0}' is already in use")]
    DuplicateOperator(String),

    #[error("Connection '{0}' does not exist on the canvas")]
    ConnectionNotFound(String),
}

/// Errors raised when converting a custom front-end format into a
/// pipewright `CanvasState`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid canvas document: {0}")]
    InvalidDocument(String),
}

/// Errors raised while ordering the execution graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cycle detected in operator graph at node '{0}'")]
    CycleDetected(String),
}

/// Errors that abort an execution pass. Per-row problems are logged and
/// defaulted instead of surfacing here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("No operators to execute")]
    EmptyCanvas,

    #[error("Operator '{0}' referenced by a connection was not found")]
    OperatorNotFound(String),

    #[error("{operator} requires {expected} input(s), found {found}")]
    MissingInput {
        operator: String,
        expected: usize,
        found: usize,
    },

    #[error("Join on operator '{0}' is missing its left or right key")]
    MissingJoinKey(String),

    #[error("Source operator '{operator_id}' failed to fetch '{table}': {message}")]
    SourceUnavailable {
        operator_id: String,
        table: String,
        message: String,
    },
}

/// Errors raised while rendering the SQL preview. These never reach the
/// caller of `generate_sql`; they are caught and rendered as a SQL comment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("{operator} requires {expected} input(s)")]
    MissingInput { operator: String, expected: usize },

    #[error("{0} operator has no SQL equivalent")]
    NoSqlEquivalent(String),

    #[error("Operator '{0}' referenced by a connection was not found")]
    OperatorNotFound(String),
}

/// Errors raised by the workflow/automation store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O failure for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt record under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No record with id '{0}'")]
    NotFound(String),
}
