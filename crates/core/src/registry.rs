use crate::commands::CommandFactory;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Externally registered commands, keyed by lowercase discriminator.
///
/// The built-in discriminators (`add`, `set`, `put`, `move`, `copy`,
/// `remove`) are resolved before this registry is consulted, so they cannot be
/// shadowed.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    factories: HashMap<String, Arc<dyn CommandFactory>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, factory: impl CommandFactory + 'static) {
        self.factories.insert(name.to_lowercase(), Arc::new(factory));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandFactory>> {
        self.factories.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).sorted_unstable().collect()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ExtensionCommand;
    use jsonmorph_context::{ExecutionContext, ExecutionResult};
    use jsonmorph_document::Document;
    use jsonmorph_expr::ExpressionParser;
    use serde_json::{Map, Value};

    struct Noop;

    impl ExtensionCommand for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn execute(&self, _: &mut Document, _: &ExecutionContext<'_>) -> ExecutionResult<()> {
            ExecutionResult::from_success(true)
        }
    }

    fn noop(_: &Map<String, Value>, _: &ExpressionParser<'_>) -> Box<dyn ExtensionCommand> {
        Box::new(Noop)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry.register("Noop", noop);
        assert!(registry.contains("NOOP"));
        assert!(registry.get("noop").is_some());
        assert!(registry.get("other").is_none());
        assert_eq!(registry.names(), vec!["noop"]);
    }
}
