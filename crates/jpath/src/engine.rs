//! Evaluates parsed queries against an arena document.
use crate::ast::{CompareOp, FilterExpr, Operand, Query, QueryRoot, Segment, Selector};
use crate::parser::parse_query;
use jsonmorph_context::{AddressQuery, QueryError};
use jsonmorph_document::{Document, NodeId};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// The default [`AddressQuery`] backend: JSONPath over a [`Document`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPathQuery;

impl JsonPathQuery {
    pub fn new() -> Self {
        Self
    }
}

impl AddressQuery for JsonPathQuery {
    fn select(
        &self,
        document: &Document,
        origin: NodeId,
        query: &str,
    ) -> Result<Vec<NodeId>, QueryError> {
        let parsed = parse_query(query)?;
        Ok(evaluate(&parsed, document, origin, origin))
    }
}

/// Runs a query. `$` starts at `origin`, `@` at `current`.
pub fn evaluate(query: &Query, document: &Document, origin: NodeId, current: NodeId) -> Vec<NodeId> {
    let start = match query.root {
        QueryRoot::Origin => origin,
        QueryRoot::Current => current,
    };
    let mut nodes = vec![start];
    for segment in &query.segments {
        if nodes.is_empty() {
            break;
        }
        nodes = apply_segment(segment, document, origin, &nodes);
    }
    nodes
}

fn apply_segment(
    segment: &Segment,
    document: &Document,
    origin: NodeId,
    context_nodes: &[NodeId],
) -> Vec<NodeId> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    for &node in context_nodes {
        match segment {
            Segment::Child(selectors) => {
                apply_selectors(selectors, document, origin, node, &mut seen, &mut results)
            }
            Segment::Descendant(selectors) => {
                apply_selectors(selectors, document, origin, node, &mut seen, &mut results);
                for descendant in document.descendants(node) {
                    apply_selectors(
                        selectors,
                        document,
                        origin,
                        descendant,
                        &mut seen,
                        &mut results,
                    );
                }
            }
        }
    }
    results
}

fn add_node(node: NodeId, seen: &mut HashSet<NodeId>, results: &mut Vec<NodeId>) {
    if seen.insert(node) {
        results.push(node);
    }
}

fn apply_selectors(
    selectors: &[Selector],
    document: &Document,
    origin: NodeId,
    node: NodeId,
    seen: &mut HashSet<NodeId>,
    results: &mut Vec<NodeId>,
) {
    for selector in selectors {
        match selector {
            Selector::Name(name) => {
                if let Some(child) = document.property(node, name) {
                    add_node(child, seen, results);
                }
            }
            Selector::Wildcard => {
                for child in document.children(node) {
                    add_node(child, seen, results);
                }
            }
            Selector::Index(index) => {
                let len = document.len(node);
                if let Some(child) =
                    normalize_index(*index, len).and_then(|i| document.element(node, i))
                {
                    add_node(child, seen, results);
                }
            }
            Selector::Slice { start, end, step } => {
                let Some(items) = document.as_array(node) else {
                    continue;
                };
                for i in slice_indices(items.len(), *start, *end, step.unwrap_or(1)) {
                    add_node(items[i], seen, results);
                }
            }
            Selector::Filter(expr) => {
                for child in document.children(node) {
                    if test(expr, document, origin, child) {
                        add_node(child, seen, results);
                    }
                }
            }
        }
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 { len as i64 + index } else { index };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

/// Python-style slice bounds; a zero step selects nothing.
fn slice_indices(len: usize, start: Option<i64>, end: Option<i64>, step: i64) -> Vec<usize> {
    let len = len as i64;
    let norm = |i: i64| if i < 0 { len + i } else { i };
    let stride = usize::try_from(step.unsigned_abs()).unwrap_or(usize::MAX);
    match step.cmp(&0) {
        Ordering::Equal => Vec::new(),
        Ordering::Greater => {
            let lower = norm(start.unwrap_or(0)).clamp(0, len);
            let upper = norm(end.unwrap_or(len)).clamp(0, len);
            (lower..upper)
                .step_by(stride)
                .map(|i| i as usize)
                .collect()
        }
        Ordering::Less => {
            let upper = start.map(norm).unwrap_or(len - 1).clamp(-1, len - 1);
            let lower = end.map(norm).unwrap_or(-1).clamp(-1, len - 1);
            (lower + 1..=upper)
                .rev()
                .step_by(stride)
                .map(|i| i as usize)
                .collect()
        }
    }
}

fn test(expr: &FilterExpr, document: &Document, origin: NodeId, current: NodeId) -> bool {
    match expr {
        FilterExpr::Or(a, b) => {
            test(a, document, origin, current) || test(b, document, origin, current)
        }
        FilterExpr::And(a, b) => {
            test(a, document, origin, current) && test(b, document, origin, current)
        }
        FilterExpr::Not(inner) => !test(inner, document, origin, current),
        FilterExpr::Constant(b) => *b,
        FilterExpr::Exists(query) => !evaluate(query, document, origin, current).is_empty(),
        FilterExpr::Compare { left, op, right } => {
            let left = operand_value(left, document, origin, current);
            let right = operand_value(right, document, origin, current);
            compare(left.as_ref(), *op, right.as_ref())
        }
    }
}

/// The value of an operand; a path yields its first match.
fn operand_value(
    operand: &Operand,
    document: &Document,
    origin: NodeId,
    current: NodeId,
) -> Option<Value> {
    match operand {
        Operand::Literal(v) => Some(v.clone()),
        Operand::Path(query) => evaluate(query, document, origin, current)
            .first()
            .map(|node| document.value(*node)),
    }
}

fn compare(left: Option<&Value>, op: CompareOp, right: Option<&Value>) -> bool {
    match op {
        CompareOp::Eq => equals(left, right),
        CompareOp::Ne => !equals(left, right),
        CompareOp::Lt => order(left, right) == Some(Ordering::Less),
        CompareOp::Le => matches!(
            order(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => order(left, right) == Some(Ordering::Greater),
        CompareOp::Ge => matches!(
            order(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Two missing operands are equal; numbers compare by value.
fn equals(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.as_f64() == b.as_f64(),
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Only numbers and strings are ordered.
fn order(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    match (left?, right?) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
