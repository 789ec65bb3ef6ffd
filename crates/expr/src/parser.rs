//! Turns value fields into [`FunctionNode`] trees.
//!
//! Parsing never fails. Text that does not form a call to a registered
//! function stays a literal, and the reason is reported through the logger.
use crate::ast::{Argument, FunctionNode};
use crate::function::FunctionRegistry;
use jsonmorph_context::{Limits, LogCategory, Logger, ScopedLogger};
use jsonmorph_jpath::BalancedTokenizer;
use serde_json::Value;

const FUNCTION_START: char = '=';

pub struct ExpressionParser<'a> {
    registry: &'a FunctionRegistry,
    log: ScopedLogger<'a>,
    limits: Limits,
    tokenizer: BalancedTokenizer,
}

impl<'a> ExpressionParser<'a> {
    pub fn new(registry: &'a FunctionRegistry, logger: &'a dyn Logger) -> Self {
        Self {
            registry,
            log: ScopedLogger::new(logger, LogCategory::Function),
            limits: Limits::default(),
            tokenizer: BalancedTokenizer::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Parses a value field. Only strings starting with `=` become invocations.
    pub fn parse(&self, value: &Value) -> FunctionNode {
        match value {
            Value::String(text) => match text.strip_prefix(FUNCTION_START) {
                Some(body) => self
                    .parse_invocation(body, 1)
                    .unwrap_or_else(|| FunctionNode::Literal(value.clone())),
                None => FunctionNode::Literal(value.clone()),
            },
            other => FunctionNode::Literal(other.clone()),
        }
    }

    /// Parses `name(args)`. `None` means the text is not a usable call.
    fn parse_invocation(&self, body: &str, depth: usize) -> Option<FunctionNode> {
        if depth > self.limits.max_expression_depth {
            self.log.warn(format!(
                "Expression nesting exceeds the limit of {}; '{}' is kept as text",
                self.limits.max_expression_depth, body
            ));
            return None;
        }

        let parts = self.tokenizer.splitn(body, '(', 2);
        let name = parts[0].trim().trim_start_matches(FUNCTION_START).trim();
        let Some(function) = self.registry.get(name) else {
            self.log
                .error(format!("Unknown function '{}' in expression '={}'", name, body));
            return None;
        };

        let args = match parts.get(1) {
            Some(rest) => {
                let rest = rest.trim_end();
                let inner = rest.strip_suffix(')').unwrap_or(rest);
                if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    self.tokenizer
                        .split(inner, ',')
                        .iter()
                        .map(|chunk| self.parse_argument(chunk, depth + 1))
                        .collect()
                }
            }
            None => Vec::new(),
        };

        Some(FunctionNode::Invocation {
            name: name.to_string(),
            function,
            args,
        })
    }

    fn parse_argument(&self, chunk: &str, depth: usize) -> Argument {
        let text = chunk.trim();

        if let Some(inner) = unquote(text) {
            return Argument::Value(Value::String(inner));
        }

        if let Some(body) = text.strip_prefix(FUNCTION_START) {
            return match self.parse_invocation(body, depth) {
                Some(node) => Argument::Node(node),
                None => Argument::Value(Value::String(text.to_string())),
            };
        }

        if self.looks_like_call(text) {
            if let Some(node) = self.parse_invocation(text, depth) {
                return Argument::Node(node);
            }
            return Argument::Value(Value::String(text.to_string()));
        }

        match serde_json::from_str::<Value>(text) {
            Ok(value) => Argument::Value(value),
            Err(_) => Argument::Node(FunctionNode::Literal(Value::String(text.to_string()))),
        }
    }

    /// `name(...)` where `name` is registered.
    fn looks_like_call(&self, text: &str) -> bool {
        let parts = self.tokenizer.splitn(text, '(', 2);
        parts.len() == 2 && text.ends_with(')') && self.registry.contains(parts[0].trim())
    }
}

/// The content of a `'...'` or `"..."` literal with escapes resolved.
fn unquote(text: &str) -> Option<String> {
    let quote = text.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    if text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else if c == quote {
            // An unescaped quote in the middle: not a single literal.
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}
