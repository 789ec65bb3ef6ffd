use jsonmorph_context::QueryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JPathError {
    #[error("Query parse error in '{0}': {1}")]
    QueryParse(String, String),

    #[error("Empty query")]
    Empty,
}

impl From<JPathError> for QueryError {
    fn from(err: JPathError) -> Self {
        match err {
            JPathError::QueryParse(query, message) => QueryError::Syntax { query, message },
            JPathError::Empty => QueryError::Syntax {
                query: String::new(),
                message: "empty query".to_string(),
            },
        }
    }
}
