//! Built-in functions registered by [`FunctionRegistry::default`].
use crate::function::FunctionRegistry;
use serde_json::Value;

mod math;
mod misc;
mod text;

pub fn register_builtins(registry: &mut FunctionRegistry) {
    registry.register("concat", text::concat);
    registry.register("upper", text::upper);
    registry.register("lower", text::lower);
    registry.register("trim", text::trim);
    registry.register("length", text::length);
    registry.register("substring", text::substring);
    registry.register("replace", text::replace);
    registry.register("join", text::join);
    registry.register("split", text::split);

    registry.register("sum", math::sum);
    registry.register("min", math::min);
    registry.register("max", math::max);
    registry.register("round", math::round);
    registry.register("tonumber", math::tonumber);

    registry.register("coalesce", misc::coalesce);
    registry.register("tostring", misc::tostring);
    registry.register("if", misc::if_then_else);
    registry.register("now", misc::now);
    registry.register("newid", misc::newid);
}

// --- Helper for string coercion ---
pub(crate) fn to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Wraps an `f64` result, keeping integral values as integers.
pub(crate) fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::function::{CallContext, FunctionArgs};
    use jsonmorph_context::{ExecutionContext, ExecutionResult, MemoryLogger};
    use jsonmorph_document::Document;
    use jsonmorph_jpath::JsonPathQuery;
    use serde_json::{Value, json};

    /// Calls a built-in with already-evaluated arguments.
    pub fn call(
        function: fn(&FunctionArgs, &CallContext<'_>) -> ExecutionResult,
        args: Vec<Value>,
    ) -> ExecutionResult {
        let document = Document::from_value(json!({}));
        let logger = MemoryLogger::new();
        let ctx = ExecutionContext::new(&JsonPathQuery, &logger);
        let call = CallContext {
            name: "test",
            document: &document,
            current: document.root(),
            context: &ctx,
        };
        let args = FunctionArgs::new(args.into_iter().map(ExecutionResult::ok).collect());
        function(&args, &call)
    }
}
