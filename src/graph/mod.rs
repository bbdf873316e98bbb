//! The derived execution graph: adjacency build, topological ordering and
//! dependency chains.

use ahash::{AHashMap, AHashSet};

use crate::canvas::CanvasState;
use crate::error::GraphError;

/// One operator's adjacency entry, derived from the document's connections.
#[derive(Debug, Clone, Default)]
pub struct ExecutionNode {
    pub id: String,
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
}

/// The ephemeral adjacency structure rebuilt from the canvas on every
/// execution request. Building is pure and never fails; connections whose
/// endpoints no longer exist contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct ExecutionGraph {
    nodes: AHashMap<String, ExecutionNode>,
    // Canvas insertion order, so traversal starts are deterministic.
    order: Vec<String>,
}

impl ExecutionGraph {
    pub fn build(state: &CanvasState) -> Self {
        let mut nodes = AHashMap::with_capacity(state.operators.len());
        let mut order = Vec::with_capacity(state.operators.len());
        for operator in &state.operators {
            nodes.insert(
                operator.id.clone(),
                ExecutionNode {
                    id: operator.id.clone(),
                    ..Default::default()
                },
            );
            order.push(operator.id.clone());
        }
        for conn in &state.connections {
            // Dangling endpoints are skipped silently.
            if let Some(target) = nodes.get_mut(&conn.target_id) {
                target.incoming.push(conn.source_id.clone());
            }
            if let Some(source) = nodes.get_mut(&conn.source_id) {
                source.outgoing.push(conn.target_id.clone());
            }
        }
        Self { nodes, order }
    }

    pub fn node(&self, id: &str) -> Option<&ExecutionNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Terminal nodes: no outgoing connections, a pipeline's output points.
    pub fn sinks(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| {
                self.nodes
                    .get(id.as_str())
                    .is_some_and(|n| n.outgoing.is_empty())
            })
            .map(String::as_str)
            .collect()
    }

    /// Dependency-first topological order: every node appears after all of
    /// its incoming nodes.
    ///
    /// Depth-first post-order over outgoing edges with an on-stack marker
    /// set for cycle detection; the post-order list is reversed at the end.
    /// A cycle is fatal for the whole request and names the node where it
    /// was found.
    pub fn execution_order(&self) -> Result<Vec<String>, GraphError> {
        let mut visited = AHashSet::new();
        let mut on_stack = AHashSet::new();
        let mut post_order = Vec::with_capacity(self.nodes.len());

        for id in &self.order {
            if !visited.contains(id.as_str()) {
                self.visit(id, &mut visited, &mut on_stack, &mut post_order)?;
            }
        }

        post_order.reverse();
        Ok(post_order)
    }

    fn visit(
        &self,
        id: &str,
        visited: &mut AHashSet<String>,
        on_stack: &mut AHashSet<String>,
        post_order: &mut Vec<String>,
    ) -> Result<(), GraphError> {
        if visited.contains(id) {
            return Ok(());
        }
        // An edge may point at an operator that was since removed; such ids
        // are not part of the graph and never enter the order.
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        if !on_stack.insert(id.to_string()) {
            return Err(GraphError::CycleDetected(id.to_string()));
        }
        for next in &node.outgoing {
            self.visit(next, visited, on_stack, post_order)?;
        }
        on_stack.remove(id);
        visited.insert(id.to_string());
        post_order.push(id.to_string());
        Ok(())
    }

    /// Every node required to evaluate `target`: the transitive closure of
    /// its incoming edges, including `target` itself.
    pub fn required_chain(&self, target: &str) -> Vec<String> {
        let mut required = AHashSet::new();
        let mut stack = vec![target.to_string()];
        while let Some(current) = stack.pop() {
            if !required.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                for upstream in &node.incoming {
                    stack.push(upstream.clone());
                }
            }
        }
        // Report the chain in canvas order for stable output.
        self.order
            .iter()
            .filter(|id| required.contains(id.as_str()))
            .cloned()
            .collect()
    }
}
