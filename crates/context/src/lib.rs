//! Shared execution plumbing for jsonmorph.
//!
//! - [`ExecutionResult`]: success flag plus value, returned by functions,
//!   commands and scripts.
//! - [`Logger`]: the diagnostics sink, with a `log`-forwarding and an
//!   in-memory implementation.
//! - [`AddressQuery`]: the pluggable backend that turns an address string into
//!   a set of document nodes.
//! - [`ExecutionContext`]: bundles the above for one script run.

pub mod context;
pub mod logger;
pub mod query;
pub mod result;

pub use context::{ExecutionContext, Limits};
pub use logger::{
    ForwardingLogger, LogCategory, LogEntry, LogLevel, Logger, MemoryLogger, ScopedLogger,
};
pub use query::{AddressQuery, QueryError};
pub use result::ExecutionResult;

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmorph_document::{Document, NodeId};
    use serde_json::json;

    struct RootOnly;

    impl AddressQuery for RootOnly {
        fn select(
            &self,
            _document: &Document,
            origin: NodeId,
            query: &str,
        ) -> Result<Vec<NodeId>, QueryError> {
            if query == "$" {
                Ok(vec![origin])
            } else {
                Err(QueryError::Unsupported {
                    query: query.to_string(),
                    message: "only '$' is understood".to_string(),
                })
            }
        }
    }

    #[test]
    fn test_select_logs_bad_queries() {
        let doc = Document::from_value(json!({}));
        let logger = MemoryLogger::new();
        let ctx = ExecutionContext::new(&RootOnly, &logger);

        assert_eq!(
            ctx.select(&doc, doc.root(), "$", LogCategory::Command),
            vec![doc.root()]
        );
        assert!(ctx.select(&doc, doc.root(), "$.a", LogCategory::Command).is_empty());
        let warnings = logger.at_level(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("$.a"));
    }

    #[test]
    fn test_limits_deserialize_with_defaults() {
        let limits: Limits = serde_json::from_value(json!({})).unwrap();
        assert_eq!(limits, Limits::default());
        let limits: Limits = serde_json::from_value(json!({ "maxExpressionDepth": 3 })).unwrap();
        assert_eq!(limits.max_expression_depth, 3);
    }
}
