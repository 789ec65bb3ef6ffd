//! The open end of the command set.
//!
//! A [`CommandFactory`] registered under a name builds an
//! [`ExtensionCommand`] from its script entry at compile time. Factories get the
//! expression parser so value fields can be compiled the same way the
//! built-in commands compile theirs.
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::Document;
use jsonmorph_expr::ExpressionParser;
use serde_json::{Map, Value};

pub trait ExtensionCommand: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, document: &mut Document, ctx: &ExecutionContext<'_>) -> ExecutionResult<()>;
}

pub trait CommandFactory: Send + Sync {
    fn create(
        &self,
        entry: &Map<String, Value>,
        parser: &ExpressionParser<'_>,
    ) -> Box<dyn ExtensionCommand>;
}

impl<F> CommandFactory for F
where
    F: Fn(&Map<String, Value>, &ExpressionParser<'_>) -> Box<dyn ExtensionCommand> + Send + Sync,
{
    fn create(
        &self,
        entry: &Map<String, Value>,
        parser: &ExpressionParser<'_>,
    ) -> Box<dyn ExtensionCommand> {
        self(entry, parser)
    }
}
