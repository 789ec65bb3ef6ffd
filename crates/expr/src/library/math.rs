use super::number;
use crate::function::{CallContext, FunctionArgs};
use jsonmorph_context::ExecutionResult;
use serde_json::Value;

/// Numbers from every argument, flattening arrays. `None` if anything else
/// turns up.
fn numbers(args: &FunctionArgs, call: &CallContext<'_>) -> Option<Vec<f64>> {
    if !args.all_succeeded() {
        return None;
    }
    let mut out = Vec::new();
    for value in args.values() {
        let items = match value {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        };
        for item in items {
            match item.as_f64() {
                Some(n) => out.push(n),
                None => {
                    call.warn(format!("'{}' is not a number", item));
                    return None;
                }
            }
        }
    }
    Some(out)
}

pub fn sum(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    match numbers(args, call) {
        Some(ns) => ExecutionResult::ok(number(ns.iter().sum())),
        None => ExecutionResult::null_failure(),
    }
}

pub fn min(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    match numbers(args, call).and_then(|ns| ns.into_iter().reduce(f64::min)) {
        Some(n) => ExecutionResult::ok(number(n)),
        None => ExecutionResult::null_failure(),
    }
}

pub fn max(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    match numbers(args, call).and_then(|ns| ns.into_iter().reduce(f64::max)) {
        Some(n) => ExecutionResult::ok(number(n)),
        None => ExecutionResult::null_failure(),
    }
}

/// `round(value, digits?)`, half away from zero.
pub fn round(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let Some(value) = args.f64(0).filter(|_| args.all_succeeded()) else {
        call.warn("argument 1 must be a number");
        return ExecutionResult::null_failure();
    };
    let digits = args.f64(1).unwrap_or(0.0).clamp(0.0, 15.0) as i32;
    let factor = 10f64.powi(digits);
    ExecutionResult::ok(number((value * factor).round() / factor))
}

/// Parses text as a number; numbers pass through.
pub fn tonumber(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    match args.result(0) {
        Some(ExecutionResult { success: true, value: Value::Number(n) }) => {
            ExecutionResult::ok(Value::Number(n.clone()))
        }
        Some(ExecutionResult { success: true, value: Value::String(s) }) => {
            match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => ExecutionResult::ok(number(n)),
                _ => {
                    call.warn(format!("'{}' is not a number", s));
                    ExecutionResult::null_failure()
                }
            }
        }
        Some(ExecutionResult { success: true, value: Value::Bool(b) }) => {
            ExecutionResult::ok(Value::from(u8::from(*b)))
        }
        _ => ExecutionResult::null_failure(),
    }
}
