//! The address-query capability. The engine never evaluates selectors itself;
//! it renders addresses back to query strings and hands them to a backend.
use jsonmorph_document::{Document, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid address '{query}': {message}")]
    Syntax { query: String, message: String },

    #[error("Unsupported address '{query}': {message}")]
    Unsupported { query: String, message: String },
}

/// Evaluates an address against a document.
///
/// Both `$` and `@` at the start of `query` denote `origin`. The result is an
/// ordered set: document order, no duplicates.
pub trait AddressQuery: Send + Sync {
    fn select(
        &self,
        document: &Document,
        origin: NodeId,
        query: &str,
    ) -> Result<Vec<NodeId>, QueryError>;
}
