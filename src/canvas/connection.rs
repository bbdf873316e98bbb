use serde::{Deserialize, Serialize};

/// A directed edge between two operators' ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_id: Option<String>,
    /// Explicit input-role binding on the target side. Joins read this to
    /// tell their left input from their right one; when absent, the
    /// evaluator falls back to connection order and warns.
    #[serde(
        rename = "targetPortId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_role: Option<InputRole>,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            source_port_id: None,
            target_role: None,
        }
    }

    pub fn with_role(mut self, role: InputRole) -> Self {
        self.target_role = Some(role);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    Left,
    Right,
}
