use super::document::CanvasState;
use crate::error::ConversionError;

/// A trait for custom front-end document formats that can be converted into
/// a pipewright [`CanvasState`].
///
/// Canvas editors rarely agree on a wire format. Implementing this trait on
/// your own parsed structs gives the executor and SQL generator a canonical
/// document to work with, without pipewright having to know your format.
///
/// # Example
///
/// ```rust
/// use pipewright::canvas::{CanvasState, IntoCanvas, Operator, OperatorKind, SourceConfig};
/// use pipewright::error::ConversionError;
///
/// struct MyNode { id: String, table: String }
/// struct MyDocument { nodes: Vec<MyNode> }
///
/// impl IntoCanvas for MyDocument {
///     fn into_canvas(self) -> Result<CanvasState, ConversionError> {
///         let mut state = CanvasState::new();
///         for node in self.nodes {
///             let op = Operator::new(
///                 node.id.clone(),
///                 node.table.clone(),
///                 OperatorKind::Source(SourceConfig {
///                     table: Some(node.table),
///                     ..Default::default()
///                 }),
///             );
///             state
///                 .add_operator(op)
///                 .map_err(|e| ConversionError::InvalidDocument(e.to_string()))?;
///         }
///         Ok(state)
///     }
/// }
/// ```
pub trait IntoCanvas {
    /// Consumes the object and converts it into a canonical canvas document.
    fn into_canvas(self) -> Result<CanvasState, ConversionError>;
}
