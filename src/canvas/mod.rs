//! The user document: operators, connections and the canvas state.

pub mod connection;
pub mod conversion;
pub mod document;
pub mod operator;

pub use connection::*;
pub use conversion::*;
pub use document::*;
pub use operator::*;
