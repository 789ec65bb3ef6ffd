//! The shared resolve-then-write algorithm behind every value command.
use crate::addressing::{ensure_path, select};
use crate::policy::{Target, ValuePolicy};
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::{Document, NodeId, Position};
use jsonmorph_expr::FunctionNode;
use jsonmorph_jpath::{SplitPath, normalize_address};
use serde_json::Value;

/// What gets written into each target.
#[derive(Debug, Clone, Copy)]
pub enum ValueSource<'a> {
    /// Evaluated per target with the container as the current node.
    Expression(&'a FunctionNode),
    Fixed(&'a Value),
}

impl ValueSource<'_> {
    fn resolve(
        &self,
        document: &Document,
        container: NodeId,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionResult {
        match self {
            ValueSource::Expression(node) => node.evaluate(document, container, ctx),
            ValueSource::Fixed(value) => ExecutionResult::ok((*value).clone()),
        }
    }
}

/// Resolves `address` to its targets and writes `source` into each one with
/// `policy`.
///
/// The result is the AND of every write. An address with no target fails with
/// a warning.
pub fn apply_value(
    document: &mut Document,
    origin: NodeId,
    address: &str,
    source: ValueSource<'_>,
    policy: &dyn ValuePolicy,
    ctx: &ExecutionContext<'_>,
) -> ExecutionResult<()> {
    let address = normalize_address(address);
    let path = SplitPath::parse(&address);
    if path.is_root() {
        ctx.commands().warn(format!(
            "{} cannot target the document root",
            policy.name()
        ));
        return ExecutionResult::from_success(false);
    }
    if path.last_element().is_some_and(|last| last.is_recursive_descent()) {
        ctx.commands().warn(format!(
            "{}: '{}' ends in an empty step and names no target",
            policy.name(),
            address
        ));
        return ExecutionResult::from_success(false);
    }

    if policy.constructs() {
        ensure_path(document, origin, &path, ctx);
    }

    let targets = resolve_targets(document, origin, &path, ctx);
    if targets.is_empty() {
        ctx.commands()
            .warn(format!("{}: no target matched '{}'", policy.name(), address));
        return ExecutionResult::from_success(false);
    }

    let mut success = true;
    for target in &targets {
        let value = source.resolve(document, target.container, ctx);
        if !value.success {
            ctx.commands().warn(format!(
                "{}: value for '{}' could not be evaluated; write skipped",
                policy.name(),
                target.describe(document)
            ));
            success = false;
            continue;
        }
        success &= policy.apply(document, target, value.value, ctx.commands());
    }
    ExecutionResult::from_success(success)
}

/// The write targets of an address.
///
/// Normally the address minus its last element selects the containers: an
/// object gets the last name as a property, an array gets an append. When the
/// last step is a search (`$..name`) or carries brackets (`$.a[1]`), the full
/// address is selected instead and every match is addressed through its
/// parent.
pub fn resolve_targets(
    document: &Document,
    origin: NodeId,
    path: &SplitPath,
    ctx: &ExecutionContext<'_>,
) -> Vec<Target> {
    let Some(last) = path.last_element().filter(|last| !last.is_recursive_descent()) else {
        return Vec::new();
    };

    if path.is_search() || last.has_array_indicator() {
        return select(document, origin, &path.render(), ctx)
            .into_iter()
            .filter_map(|node| {
                let parent = document.parent(node)?;
                match document.position(node) {
                    Position::Property(name) => Some(Target::property(parent, name)),
                    Position::Index(index) => Some(Target::index(parent, index)),
                    Position::Root | Position::Detached => None,
                }
            })
            .collect();
    }

    let Some(parent) = path.parent() else {
        return Vec::new();
    };
    let mut targets = Vec::new();
    for container in select(document, origin, &parent.render(), ctx) {
        if document.is_object(container) {
            targets.push(Target::property(container, last.name()));
        } else if document.is_array(container) {
            targets.push(Target::append(container));
        } else {
            ctx.commands().warn(format!(
                "'{}' is a {} value and cannot hold '{}'",
                document.describe(container),
                document.node_type(container),
                last.name()
            ));
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AddPolicy, PutPolicy, SetPolicy};
    use jsonmorph_context::{LogLevel, MemoryLogger};
    use jsonmorph_expr::{ExpressionParser, FunctionRegistry};
    use jsonmorph_jpath::JsonPathQuery;
    use serde_json::json;

    fn run(
        data: Value,
        address: &str,
        value: Value,
        policy: &dyn ValuePolicy,
    ) -> (Value, bool, MemoryLogger) {
        let logger = MemoryLogger::new();
        let registry = FunctionRegistry::default();
        let node = ExpressionParser::new(&registry, &logger).parse(&value);
        let ctx = ExecutionContext::new(&JsonPathQuery, &logger);
        let mut doc = Document::from_value(data);
        let root = doc.root();
        let result = apply_value(
            &mut doc,
            root,
            address,
            ValueSource::Expression(&node),
            policy,
            &ctx,
        );
        (doc.to_value(), result.success, logger)
    }

    #[test]
    fn test_add_builds_missing_structure() {
        let (doc, ok, _) = run(json!({}), "$.customer.address.city", json!("Oslo"), &AddPolicy);
        assert!(ok);
        assert_eq!(doc, json!({"customer": {"address": {"city": "Oslo"}}}));
    }

    #[test]
    fn test_address_without_root_marker() {
        let (doc, ok, _) = run(json!({}), "a.b", json!(1), &PutPolicy);
        assert!(ok);
        assert_eq!(doc, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_does_not_construct() {
        let (doc, ok, logger) = run(json!({}), "$.a.b", json!(1), &SetPolicy);
        assert!(!ok);
        assert_eq!(doc, json!({}));
        assert!(logger.count(LogLevel::Warning) >= 1);
    }

    #[test]
    fn test_value_is_evaluated_per_container() {
        let (doc, ok, _) = run(
            json!({"people": [
                {"first": "Ada", "last": "Lovelace"},
                {"first": "Alan", "last": "Turing"}
            ]}),
            "$.people[*].name",
            json!("=concat(@.first,' ',@.last)"),
            &PutPolicy,
        );
        assert!(ok);
        assert_eq!(doc["people"][0]["name"], json!("Ada Lovelace"));
        assert_eq!(doc["people"][1]["name"], json!("Alan Turing"));
    }

    #[test]
    fn test_generated_values_differ_per_target() {
        let (doc, _, _) = run(json!({"xs": [{}, {}]}), "$.xs[*].id", json!("=newid()"), &AddPolicy);
        assert_ne!(doc["xs"][0]["id"], doc["xs"][1]["id"]);
    }

    #[test]
    fn test_array_container_appends() {
        let (doc, ok, _) = run(json!({"tags": ["a"]}), "$.tags.ignored", json!("b"), &AddPolicy);
        assert!(ok);
        assert_eq!(doc, json!({"tags": ["a", "b"]}));
    }

    #[test]
    fn test_indexed_address_targets_the_slot() {
        let (doc, ok, _) = run(json!({"a": [1, 2, 3]}), "$.a[1]", json!(20), &SetPolicy);
        assert!(ok);
        assert_eq!(doc, json!({"a": [1, 20, 3]}));
    }

    #[test]
    fn test_search_mode_writes_every_match() {
        let (doc, ok, _) = run(
            json!({"a": {"id": 1}, "b": [{"id": 2}, {"x": 0}]}),
            "$..id",
            json!(0),
            &SetPolicy,
        );
        assert!(ok);
        assert_eq!(doc, json!({"a": {"id": 0}, "b": [{"id": 0}, {"x": 0}]}));
    }

    #[test]
    fn test_failed_evaluation_skips_write() {
        let (doc, ok, _) = run(json!({}), "$.copy", json!("$.missing"), &PutPolicy);
        assert!(!ok);
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_no_target_fails_with_warning() {
        let (_, ok, logger) = run(json!({"a": 1}), "$.x[0].y", json!(1), &PutPolicy);
        assert!(!ok);
        assert!(logger
            .at_level(LogLevel::Warning)
            .iter()
            .any(|e| e.message.contains("no target")));
    }

    #[test]
    fn test_trailing_dot_writes_nothing() {
        let (doc, ok, logger) = run(json!({"a": {}}), "$.a.", json!(1), &PutPolicy);
        assert!(!ok);
        assert_eq!(doc, json!({"a": {}}));
        assert_eq!(logger.count(LogLevel::Warning), 1);
    }

    #[test]
    fn test_root_is_not_a_value_target() {
        let (_, ok, _) = run(json!({}), "$", json!(1), &PutPolicy);
        assert!(!ok);
    }
}
