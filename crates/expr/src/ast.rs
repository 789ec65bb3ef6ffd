//! Defines the tree produced by the expression parser and how it evaluates.
use crate::function::{CallContext, Function, FunctionArgs};
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::{Document, NodeId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A parsed, re-evaluable value expression.
#[derive(Clone)]
pub enum FunctionNode {
    /// A constant. A string starting with `$` or `@` is an address and is
    /// resolved against the document each time it is evaluated.
    Literal(Value),
    /// A call to a registered function.
    Invocation {
        name: String,
        function: Arc<dyn Function>,
        args: Vec<Argument>,
    },
}

/// One argument of an invocation.
#[derive(Debug, Clone)]
pub enum Argument {
    /// A fixed value: quoted text or a JSON literal. Never re-read as an address.
    Value(Value),
    Node(FunctionNode),
}

impl FunctionNode {
    pub fn literal(value: impl Into<Value>) -> Self {
        FunctionNode::Literal(value.into())
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, FunctionNode::Invocation { .. })
    }

    /// Evaluates against `document` with `current` as the `@` node.
    pub fn evaluate(
        &self,
        document: &Document,
        current: NodeId,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionResult {
        match self {
            FunctionNode::Literal(Value::String(text))
                if text.starts_with('$') || text.starts_with('@') =>
            {
                resolve_address(text, document, current, ctx)
            }
            FunctionNode::Literal(value) => ExecutionResult::ok(value.clone()),
            FunctionNode::Invocation {
                name,
                function,
                args,
            } => {
                let mut results = Vec::with_capacity(args.len());
                for (i, arg) in args.iter().enumerate() {
                    let result = arg.evaluate(document, current, ctx);
                    if !result.success {
                        ctx.functions().warn(format!(
                            "Argument {} of '{}' could not be evaluated",
                            i + 1,
                            name
                        ));
                    }
                    results.push(result);
                }
                let call = CallContext {
                    name,
                    document,
                    current,
                    context: ctx,
                };
                function.invoke(&FunctionArgs::new(results), &call)
            }
        }
    }
}

impl Argument {
    pub fn evaluate(
        &self,
        document: &Document,
        current: NodeId,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionResult {
        match self {
            Argument::Value(value) => ExecutionResult::ok(value.clone()),
            Argument::Node(node) => node.evaluate(document, current, ctx),
        }
    }
}

/// `@...` is looked up from the current node, `$...` from the root. Text that
/// is not a valid address is returned as a plain string.
fn resolve_address(
    text: &str,
    document: &Document,
    current: NodeId,
    ctx: &ExecutionContext<'_>,
) -> ExecutionResult {
    let (origin, query) = match text.strip_prefix('@') {
        Some(rest) => (current, format!("${}", rest)),
        None => (document.root(), text.to_string()),
    };
    let nodes = match ctx.try_select(document, origin, &query) {
        Ok(nodes) => nodes,
        Err(_) => return ExecutionResult::ok(Value::String(text.to_string())),
    };
    match nodes.as_slice() {
        [] => {
            ctx.functions()
                .warn(format!("Address '{}' did not match any value", text));
            ExecutionResult::null_failure()
        }
        [single] => ExecutionResult::ok(document.value(*single)),
        many => ExecutionResult::ok(Value::Array(
            many.iter().map(|n| document.value(*n)).collect(),
        )),
    }
}

impl fmt::Debug for FunctionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionNode::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            FunctionNode::Invocation { name, args, .. } => f
                .debug_struct("Invocation")
                .field("name", name)
                .field("args", args)
                .finish(),
        }
    }
}

impl fmt::Display for FunctionNode {
    /// Renders the node back to expression text, without the leading `=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionNode::Literal(Value::String(s)) => f.write_str(s),
            FunctionNode::Literal(value) => write!(f, "{}", value),
            FunctionNode::Invocation { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    match arg {
                        Argument::Value(Value::String(s)) => {
                            write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))?
                        }
                        Argument::Value(value) => write!(f, "{}", value)?,
                        Argument::Node(node) => write!(f, "{}", node)?,
                    }
                }
                f.write_str(")")
            }
        }
    }
}
