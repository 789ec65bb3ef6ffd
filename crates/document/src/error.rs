use crate::NodeType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Expected an object at '{path}', found {found}")]
    NotAnObject { path: String, found: NodeType },

    #[error("Expected an array at '{path}', found {found}")]
    NotAnArray { path: String, found: NodeType },

    #[error("Index {index} is out of bounds at '{path}' (length {len})")]
    IndexOutOfBounds { path: String, index: usize, len: usize },

    #[error("The document root cannot be detached")]
    DetachRoot,

    #[error("Node {0} is not attached to the document")]
    Detached(String),
}
