//! Defines the function contract and the registry the parser resolves names
//! against.
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::{Document, NodeId};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Everything a function sees about the call site.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    /// The registered name the expression used.
    pub name: &'a str,
    pub document: &'a Document,
    /// The node the expression is evaluated against (`@`).
    pub current: NodeId,
    pub context: &'a ExecutionContext<'a>,
}

impl CallContext<'_> {
    /// Logs a function-category warning prefixed with the function name.
    pub fn warn(&self, message: impl fmt::Display) {
        self.context
            .functions()
            .warn(format!("{}(): {}", self.name, message));
    }
}

/// Evaluated arguments, each with its own success flag.
#[derive(Debug, Clone, Default)]
pub struct FunctionArgs {
    results: Vec<ExecutionResult>,
}

impl FunctionArgs {
    pub fn new(results: Vec<ExecutionResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.results.get(index).map(|r| &r.value)
    }

    pub fn result(&self, index: usize) -> Option<&ExecutionResult> {
        self.results.get(index)
    }

    pub fn str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Value::as_str)
    }

    pub fn f64(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(Value::as_f64)
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(ExecutionResult::is_success)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.results.iter().map(|r| &r.value)
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }
}

/// A named operation callable from an expression.
///
/// Implemented for any `Fn(&FunctionArgs, &CallContext) -> ExecutionResult`,
/// so plain functions and closures register directly.
pub trait Function: Send + Sync {
    fn invoke(&self, args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult;
}

impl<F> Function for F
where
    F: Fn(&FunctionArgs, &CallContext<'_>) -> ExecutionResult + Send + Sync,
{
    fn invoke(&self, args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
        self(args, call)
    }
}

/// A registry to hold all available functions for the expression parser.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, function: impl Function + 'static) {
        self.functions
            .insert(name.to_lowercase(), Arc::new(function));
    }

    pub fn register_arc(&mut self, name: &str, function: Arc<dyn Function>) {
        self.functions.insert(name.to_lowercase(), function);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<dyn Function>> {
        self.functions.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        crate::library::register_builtins(&mut registry);
        registry
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
