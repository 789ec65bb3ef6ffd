use crate::apply::{ValueSource, apply_value};
use crate::policy::ValuePolicy;
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::Document;
use jsonmorph_expr::FunctionNode;

/// An add, set or put: an address and a value expression.
#[derive(Debug, Clone)]
pub struct ValueCommand {
    pub path: Option<String>,
    pub value: Option<FunctionNode>,
}

impl ValueCommand {
    pub fn new(path: impl Into<String>, value: FunctionNode) -> Self {
        Self {
            path: Some(path.into()),
            value: Some(value),
        }
    }

    pub fn execute(
        &self,
        policy: &dyn ValuePolicy,
        document: &mut Document,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionResult<()> {
        let Some(path) = self.path.as_deref().filter(|p| !p.trim().is_empty()) else {
            ctx.commands()
                .warn(format!("{}: missing required 'path'", policy.name()));
            return ExecutionResult::from_success(false);
        };
        let Some(value) = &self.value else {
            ctx.commands()
                .warn(format!("{}: missing required 'value' for '{}'", policy.name(), path));
            return ExecutionResult::from_success(false);
        };
        let root = document.root();
        apply_value(
            document,
            root,
            path,
            ValueSource::Expression(value),
            policy,
            ctx,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PutPolicy;
    use jsonmorph_context::{LogLevel, MemoryLogger};
    use jsonmorph_jpath::JsonPathQuery;
    use serde_json::json;

    #[test]
    fn test_blank_path_writes_nothing() {
        let logger = MemoryLogger::new();
        let ctx = ExecutionContext::new(&JsonPathQuery, &logger);
        let mut doc = Document::from_value(json!({"a": {}}));
        let command = ValueCommand::new("", FunctionNode::Literal(json!(1)));
        assert!(!command.execute(&PutPolicy, &mut doc, &ctx).success);
        assert_eq!(doc.to_value(), json!({"a": {}}));
        assert_eq!(logger.count(LogLevel::Warning), 1);
    }
}
