use crate::addressing::select;
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::Document;
use jsonmorph_jpath::normalize_address;

/// Detaches every node an address matches.
#[derive(Debug, Clone)]
pub struct RemoveCommand {
    pub path: Option<String>,
}

impl RemoveCommand {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn execute(&self, document: &mut Document, ctx: &ExecutionContext<'_>) -> ExecutionResult<()> {
        let Some(path) = self.path.as_deref().filter(|p| !p.trim().is_empty()) else {
            ctx.commands().warn("remove: missing required 'path'");
            return ExecutionResult::from_success(false);
        };
        let address = normalize_address(path);
        let root = document.root();
        let matches = select(document, root, &address, ctx);
        if matches.is_empty() {
            ctx.commands()
                .warn(format!("remove: nothing matched '{}'", address));
            return ExecutionResult::from_success(false);
        }

        let mut success = true;
        for node in matches {
            // An earlier match may have been an ancestor of this one.
            if !document.is_attached(node) {
                continue;
            }
            let described = document.describe(node);
            match document.detach(node) {
                Ok(_) => ctx.commands().info(format!("Removed '{}'", described)),
                Err(e) => {
                    ctx.commands().warn(format!("remove: {}", e));
                    success = false;
                }
            }
        }
        ExecutionResult::from_success(success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmorph_context::{LogLevel, MemoryLogger};
    use jsonmorph_jpath::JsonPathQuery;
    use serde_json::{Value, json};

    fn remove(data: Value, path: &str) -> (Value, bool, MemoryLogger) {
        let logger = MemoryLogger::new();
        let ctx = ExecutionContext::new(&JsonPathQuery, &logger);
        let mut doc = Document::from_value(data);
        let ok = RemoveCommand::new(path).execute(&mut doc, &ctx).success;
        (doc.to_value(), ok, logger)
    }

    #[test]
    fn test_removes_property_and_renumbers_array() {
        let (doc, ok, _) = remove(json!({"a": 1, "b": 2}), "$.a");
        assert!(ok);
        assert_eq!(doc, json!({"b": 2}));

        let (doc, ok, _) = remove(json!({"xs": [1, 2, 3, 4]}), "$.xs[?(@ > 2)]");
        assert!(ok);
        assert_eq!(doc, json!({"xs": [1, 2]}));
    }

    #[test]
    fn test_nested_matches_are_removed_once() {
        let (doc, ok, _) = remove(json!({"a": {"a": {"a": 1}}, "b": 1}), "$..a");
        assert!(ok);
        assert_eq!(doc, json!({"b": 1}));
    }

    #[test]
    fn test_blank_path_is_a_validation_failure() {
        let (doc, ok, logger) = remove(json!({"a": 1}), "");
        assert!(!ok);
        assert_eq!(doc, json!({"a": 1}));
        assert_eq!(logger.count(LogLevel::Warning), 1);
    }

    #[test]
    fn test_nothing_matched_warns() {
        let (doc, ok, logger) = remove(json!({"a": 1}), "$.zzz");
        assert!(!ok);
        assert_eq!(doc, json!({"a": 1}));
        assert_eq!(logger.count(LogLevel::Warning), 1);
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let (doc, ok, _) = remove(json!({"a": 1}), "$");
        assert!(!ok);
        assert_eq!(doc, json!({"a": 1}));
    }
}
