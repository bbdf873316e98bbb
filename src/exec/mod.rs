//! The recursive, memoized operator evaluator.

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::analysis::{HeuristicAnalyzer, TextAnalyzer};
use crate::canvas::{CanvasState, Connection, InputRole, OperatorKind};
use crate::error::ExecuteError;
use crate::graph::ExecutionGraph;
use crate::source::{SampleProvider, TableProvider};
use crate::table::Table;

mod aggregate;
mod analyze;
mod join;
mod relational;
mod union;

/// Evaluates canvas documents against pluggable collaborators.
///
/// An `Executor` is cheap to keep around and stateless between runs; each
/// [`Executor::run`] opens a fresh pass with its own memo cache, so results
/// are cached per pass and never leak across runs.
pub struct Executor {
    provider: Box<dyn TableProvider>,
    analyzer: Box<dyn TextAnalyzer>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(Box::new(SampleProvider::new()), Box::new(HeuristicAnalyzer::new()))
    }
}

impl Executor {
    pub fn new(provider: Box<dyn TableProvider>, analyzer: Box<dyn TextAnalyzer>) -> Self {
        Self { provider, analyzer }
    }

    /// Executes the whole document and returns the terminal result: the
    /// table produced by the last sink in execution order.
    ///
    /// A cycle or structural failure aborts the pass with an error and
    /// leaves the document untouched.
    pub fn run(&self, state: &CanvasState) -> Result<Table, ExecuteError> {
        let graph = ExecutionGraph::build(state);
        let order = graph.execution_order()?;
        let Some(terminal) = order.last().cloned() else {
            return Err(ExecuteError::EmptyCanvas);
        };
        debug!(nodes = order.len(), terminal = %terminal, "executing canvas");
        let mut pass = Pass::default();
        self.evaluate_node(state, &mut pass, &terminal)
    }

    /// Evaluates one operator (and, transitively, everything upstream of
    /// it). The cycle check still covers the whole graph: a cyclic document
    /// is invalid even where the cycle does not feed this node.
    pub fn evaluate(&self, state: &CanvasState, node_id: &str) -> Result<Table, ExecuteError> {
        let graph = ExecutionGraph::build(state);
        graph.execution_order()?;
        if state.operator(node_id).is_none() {
            return Err(ExecuteError::OperatorNotFound(node_id.to_string()));
        }
        let mut pass = Pass::default();
        self.evaluate_node(state, &mut pass, node_id)
    }

    fn evaluate_node(
        &self,
        state: &CanvasState,
        pass: &mut Pass,
        node_id: &str,
    ) -> Result<Table, ExecuteError> {
        if let Some(hit) = pass.cache.get(node_id) {
            return Ok(hit.clone());
        }

        let operator = state
            .operator(node_id)
            .ok_or_else(|| ExecuteError::OperatorNotFound(node_id.to_string()))?;

        let incoming = ordered_inputs(state, operator.kind.name(), node_id);
        let mut inputs = Vec::with_capacity(incoming.len());
        for conn in &incoming {
            inputs.push(self.evaluate_node(state, pass, &conn.source_id)?);
        }

        let result = match &operator.kind {
            OperatorKind::Source(config) => {
                let table = self.provider.fetch(node_id, config)?;
                if config.selected_columns.is_empty() {
                    table
                } else {
                    relational::project(&config.selected_columns, table)
                }
            }
            OperatorKind::Filter(config) => {
                let [input] = require_inputs::<1>(operator.kind.name(), node_id, inputs)?;
                relational::filter(config, input)
            }
            OperatorKind::Join(config) => {
                let [left, right] = require_inputs::<2>(operator.kind.name(), node_id, inputs)?;
                join::join(node_id, config, left, right)?
            }
            OperatorKind::Aggregate(config) => {
                let [input] = require_inputs::<1>(operator.kind.name(), node_id, inputs)?;
                aggregate::aggregate(config, input)
            }
            OperatorKind::Select(config) => {
                let [input] = require_inputs::<1>(operator.kind.name(), node_id, inputs)?;
                relational::select(config, input)
            }
            OperatorKind::Union(config) => {
                if inputs.len() < 2 {
                    return Err(ExecuteError::MissingInput {
                        operator: qualified(operator.kind.name(), node_id),
                        expected: 2,
                        found: inputs.len(),
                    });
                }
                union::union(config, inputs)
            }
            OperatorKind::Sort(config) => {
                let [input] = require_inputs::<1>(operator.kind.name(), node_id, inputs)?;
                relational::sort(config, input)
            }
            OperatorKind::Limit(config) => {
                let [input] = require_inputs::<1>(operator.kind.name(), node_id, inputs)?;
                relational::limit(config, input)
            }
            OperatorKind::Analyze(config) => {
                let [input] = require_inputs::<1>(operator.kind.name(), node_id, inputs)?;
                analyze::analyze(self.analyzer.as_ref(), config, input)
            }
        };

        pass.cache.insert(node_id.to_string(), result.clone());
        Ok(result)
    }
}

/// The memo cache for a single execution pass: at most one computation per
/// operator id, shared by every path that reaches it.
#[derive(Default)]
struct Pass {
    cache: AHashMap<String, Table>,
}

/// Collects the incoming connections of a node in evaluation order.
///
/// When the edges carry explicit left/right roles those decide the order;
/// otherwise connection order is used, with a warning for multi-input
/// operators where that ordering is user-visible.
fn ordered_inputs<'a>(
    state: &'a CanvasState,
    kind_name: &str,
    node_id: &str,
) -> Vec<&'a Connection> {
    let mut incoming: Vec<&Connection> = state
        .connections
        .iter()
        .filter(|conn| conn.target_id == node_id)
        .collect();

    if kind_name == "join" && incoming.len() == 2 {
        let left = incoming.iter().position(|c| c.target_role == Some(InputRole::Left));
        let right = incoming
            .iter()
            .position(|c| c.target_role == Some(InputRole::Right));
        match (left, right) {
            (Some(l), Some(r)) if l != r => {
                incoming = vec![incoming[l], incoming[r]];
            }
            _ => {
                warn!(
                    operator = %node_id,
                    "join inputs bound by connection order; set left/right ports for a stable binding"
                );
            }
        }
    }
    incoming
}

/// Validates the minimum input count. Extra inputs beyond what the operator
/// consumes are ignored with a warning rather than failing the pass.
fn require_inputs<const N: usize>(
    kind_name: &str,
    node_id: &str,
    mut inputs: Vec<Table>,
) -> Result<[Table; N], ExecuteError> {
    let found = inputs.len();
    if found < N {
        return Err(ExecuteError::MissingInput {
            operator: qualified(kind_name, node_id),
            expected: N,
            found,
        });
    }
    if found > N {
        warn!(operator = %node_id, used = N, found, "ignoring extra inputs");
        inputs.truncate(N);
    }
    inputs.try_into().map_err(|_| ExecuteError::MissingInput {
        operator: qualified(kind_name, node_id),
        expected: N,
        found,
    })
}

fn qualified(kind_name: &str, node_id: &str) -> String {
    format!("{} operator '{}'", kind_name, node_id)
}
