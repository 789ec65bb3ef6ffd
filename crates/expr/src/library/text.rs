use super::to_text;
use crate::function::{CallContext, FunctionArgs};
use itertools::Itertools;
use jsonmorph_context::ExecutionResult;
use serde_json::Value;

/// The text form of a required scalar argument.
fn text_arg(args: &FunctionArgs, index: usize, call: &CallContext<'_>) -> Option<String> {
    match args.result(index) {
        Some(r) if r.success && !r.value.is_null() && !r.value.is_array() && !r.value.is_object() => {
            Some(to_text(&r.value))
        }
        Some(r) if r.success => {
            call.warn(format!("argument {} is not text: {}", index + 1, r.value));
            None
        }
        Some(_) => None,
        None => {
            call.warn(format!("missing argument {}", index + 1));
            None
        }
    }
}

fn map_text(args: &FunctionArgs, call: &CallContext<'_>, f: impl Fn(&str) -> String) -> ExecutionResult {
    match text_arg(args, 0, call) {
        Some(s) => ExecutionResult::ok(Value::String(f(&s))),
        None => ExecutionResult::null_failure(),
    }
}

pub fn concat(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    if !args.all_succeeded() {
        call.warn("not every argument could be evaluated");
        return ExecutionResult::null_failure();
    }
    ExecutionResult::ok(args.values().map(to_text).collect::<String>().into())
}

pub fn upper(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    map_text(args, call, str::to_uppercase)
}

pub fn lower(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    map_text(args, call, str::to_lowercase)
}

pub fn trim(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    map_text(args, call, |s| s.trim().to_string())
}

/// Characters of a string, elements of an array or properties of an object.
pub fn length(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let len = match args.result(0) {
        Some(r) if !r.success => return ExecutionResult::null_failure(),
        Some(ExecutionResult { value: Value::String(s), .. }) => s.chars().count(),
        Some(ExecutionResult { value: Value::Array(a), .. }) => a.len(),
        Some(ExecutionResult { value: Value::Object(o), .. }) => o.len(),
        Some(ExecutionResult { value: Value::Null, .. }) => 0,
        Some(ExecutionResult { value, .. }) => to_text(value).chars().count(),
        None => {
            call.warn("missing argument 1");
            return ExecutionResult::null_failure();
        }
    };
    ExecutionResult::ok(Value::from(len))
}

/// `substring(text, start, length?)`, counted in characters.
pub fn substring(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let Some(text) = text_arg(args, 0, call) else {
        return ExecutionResult::null_failure();
    };
    let Some(start) = args.f64(1) else {
        call.warn("argument 2 must be a number");
        return ExecutionResult::null_failure();
    };
    let start = start.max(0.0) as usize;
    let taken: String = match args.f64(2) {
        Some(len) => text.chars().skip(start).take(len.max(0.0) as usize).collect(),
        None => text.chars().skip(start).collect(),
    };
    ExecutionResult::ok(Value::String(taken))
}

/// `replace(text, from, to)` replaces every occurrence.
pub fn replace(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    match (
        text_arg(args, 0, call),
        text_arg(args, 1, call),
        text_arg(args, 2, call),
    ) {
        (Some(text), Some(from), Some(to)) if !from.is_empty() => {
            ExecutionResult::ok(Value::String(text.replace(&from, &to)))
        }
        (Some(text), Some(_), Some(_)) => ExecutionResult::ok(Value::String(text)),
        _ => ExecutionResult::null_failure(),
    }
}

/// `join(array, separator?)`.
pub fn join(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let separator = args.get(1).map(to_text).unwrap_or_default();
    match args.result(0) {
        Some(ExecutionResult { success: true, value: Value::Array(items) }) => {
            ExecutionResult::ok(Value::String(items.iter().map(to_text).join(&separator)))
        }
        Some(ExecutionResult { success: true, value }) => {
            call.warn(format!("argument 1 is not an array: {}", value));
            ExecutionResult::null_failure()
        }
        _ => ExecutionResult::null_failure(),
    }
}

/// `split(text, separator)`.
pub fn split(args: &FunctionArgs, call: &CallContext<'_>) -> ExecutionResult {
    let (Some(text), Some(separator)) = (text_arg(args, 0, call), text_arg(args, 1, call)) else {
        return ExecutionResult::null_failure();
    };
    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        text.split(separator.as_str())
            .map(|s| Value::String(s.to_string()))
            .collect()
    };
    ExecutionResult::ok(Value::Array(parts))
}
