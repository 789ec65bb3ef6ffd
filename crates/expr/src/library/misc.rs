use super::to_text;
use crate::function::{CallContext, FunctionArgs};
use chrono::format::{Item, StrftimeItems};
use chrono::{SecondsFormat, Utc};
use jsonmorph_context::ExecutionResult;
use rand::Rng;
use serde_json::Value;

/// The first argument that evaluated to something other than `null`.
pub fn coalesce(args: &FunctionArgs, _call: &CallContext<'_>) -> ExecutionResult {
    args.results()
        .iter()
        .find(|r| r.success && !r.value.is_null())
        .map(|r| ExecutionResult::ok(r.value.clone()))
        .unwrap_or_else(|| ExecutionResult::ok(Value::Null))
}

pub fn tostring(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    match args.result(0) {
        Some(r) if r.success => ExecutionResult::ok(Value::String(to_text(&r.value))),
        Some(_) => ExecutionResult::null_failure(),
        None => {
            call.warn("missing argument 1");
            ExecutionResult::null_failure()
        }
    }
}

/// `if(condition, then, else?)`. The condition is falsy when it is `false`,
/// `null`, `0`, an empty string or a failed evaluation.
pub fn if_then_else(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let Some(condition) = args.result(0) else {
        call.warn("missing condition");
        return ExecutionResult::null_failure();
    };
    let truthy = condition.success
        && match &condition.value {
            Value::Null | Value::Bool(false) => false,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        };
    let branch = if truthy { 1 } else { 2 };
    args.result(branch)
        .cloned()
        .unwrap_or_else(|| ExecutionResult::ok(Value::Null))
}

/// The current UTC time as RFC 3339, or formatted with a `strftime` pattern.
pub fn now(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let now = Utc::now();
    let text = match args.str(0) {
        Some(pattern) => {
            if StrftimeItems::new(pattern).any(|item| item == Item::Error) {
                call.warn(format!("invalid format '{}'", pattern));
                return ExecutionResult::null_failure();
            }
            now.format_with_items(StrftimeItems::new(pattern)).to_string()
        }
        None => now.to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    ExecutionResult::ok(Value::String(text))
}

/// A random 128-bit identifier as 32 lowercase hex digits.
pub fn newid(_args: &FunctionArgs, _call: &CallContext<'_>) -> ExecutionResult {
    let id: u128 = rand::rng().random();
    ExecutionResult::ok(Value::String(format!("{:032x}", id)))
}
