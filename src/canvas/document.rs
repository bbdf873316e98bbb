use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::connection::Connection;
use super::operator::Operator;
use crate::error::CanvasError;

/// The full user document: operators, connections and the current selection.
///
/// All mutation goes through the command methods below so the structural
/// invariants hold at every point: operator ids are unique, every
/// connection's endpoints exist, there are no self-loops or duplicate edges,
/// and the connection graph stays acyclic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub selected_operator_id: Option<String>,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operator(&self, id: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id == id)
    }

    pub fn add_operator(&mut self, operator: Operator) -> Result<(), CanvasError> {
        if self.operator(&operator.id).is_some() {
            return Err(CanvasError::DuplicateOperator(operator.id));
        }
        self.operators.push(operator);
        Ok(())
    }

    /// Applies an update closure to one operator's configuration.
    pub fn update_operator<F>(&mut self, id: &str, update: F) -> Result<(), CanvasError>
    where
        F: FnOnce(&mut Operator),
    {
        let operator = self
            .operators
            .iter_mut()
            .find(|op| op.id == id)
            .ok_or_else(|| CanvasError::OperatorNotFound(id.to_string()))?;
        update(operator);
        Ok(())
    }

    /// Removes an operator and cascades to every connection referencing it.
    pub fn remove_operator(&mut self, id: &str) -> Result<(), CanvasError> {
        if self.operator(id).is_none() {
            return Err(CanvasError::OperatorNotFound(id.to_string()));
        }
        self.operators.retain(|op| op.id != id);
        self.connections
            .retain(|conn| conn.source_id != id && conn.target_id != id);
        if self.selected_operator_id.as_deref() == Some(id) {
            self.selected_operator_id = None;
        }
        Ok(())
    }

    /// Adds a connection after checking it keeps the document well-formed:
    /// both endpoints exist, no self-loop, no duplicate edge, and no path
    /// from the target back to the source (which would close a cycle).
    pub fn connect(&mut self, connection: Connection) -> Result<(), CanvasError> {
        if connection.source_id == connection.target_id {
            return Err(CanvasError::SelfLoop(connection.source_id));
        }
        for endpoint in [&connection.source_id, &connection.target_id] {
            if self.operator(endpoint).is_none() {
                return Err(CanvasError::OperatorNotFound(endpoint.clone()));
            }
        }
        let duplicate = self.connections.iter().any(|conn| {
            conn.source_id == connection.source_id && conn.target_id == connection.target_id
        });
        if duplicate {
            return Err(CanvasError::DuplicateConnection {
                source_id: connection.source_id,
                target_id: connection.target_id,
            });
        }
        if self.reaches(&connection.target_id, &connection.source_id) {
            return Err(CanvasError::WouldCreateCycle {
                source_id: connection.source_id,
                target_id: connection.target_id,
            });
        }
        self.connections.push(connection);
        Ok(())
    }

    pub fn disconnect(&mut self, connection_id: &str) -> Result<(), CanvasError> {
        let before = self.connections.len();
        self.connections.retain(|conn| conn.id != connection_id);
        if self.connections.len() == before {
            return Err(CanvasError::ConnectionNotFound(connection_id.to_string()));
        }
        Ok(())
    }

    pub fn select_operator(&mut self, id: Option<&str>) {
        self.selected_operator_id = id.map(str::to_string);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `to` is reachable from `from` by following connections forward.
    fn reaches(&self, from: &str, to: &str) -> bool {
        let mut visited = AHashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for conn in &self.connections {
                if conn.source_id == current {
                    stack.push(&conn.target_id);
                }
            }
        }
        false
    }
}
