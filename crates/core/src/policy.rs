//! How a value lands in its target.
//!
//! The command core resolves an address to a list of [`Target`]s and hands
//! each one, together with the evaluated value, to a [`ValuePolicy`]. Add, Set
//! and Put differ only in their policy.
use jsonmorph_context::ScopedLogger;
use jsonmorph_document::{Document, NodeId};
use serde_json::Value;

/// Where inside a container a value goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Property(String),
    Index(usize),
    /// The end of an array container.
    Append,
}

/// A container node and a slot within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub container: NodeId,
    pub slot: Slot,
}

/// What currently occupies a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Node(NodeId),
    /// The target is the end of an array; nothing can occupy it.
    Append,
}

impl Target {
    pub fn property(container: NodeId, name: impl Into<String>) -> Self {
        Self {
            container,
            slot: Slot::Property(name.into()),
        }
    }

    pub fn index(container: NodeId, index: usize) -> Self {
        Self {
            container,
            slot: Slot::Index(index),
        }
    }

    pub fn append(container: NodeId) -> Self {
        Self {
            container,
            slot: Slot::Append,
        }
    }

    pub fn occupant(&self, document: &Document) -> Occupant {
        let existing = match &self.slot {
            Slot::Property(name) => document.property(self.container, name),
            Slot::Index(index) => document.element(self.container, *index),
            Slot::Append => return Occupant::Append,
        };
        existing.map_or(Occupant::Empty, Occupant::Node)
    }

    /// A readable address such as `$.a.b`, `$.items[2]` or `$.items[+]`.
    pub fn describe(&self, document: &Document) -> String {
        let container = document.describe(self.container);
        match &self.slot {
            Slot::Property(name) => format!("{}.{}", container, name),
            Slot::Index(index) => format!("{}[{}]", container, index),
            Slot::Append => format!("{}[+]", container),
        }
    }
}

/// A per-command rule for writing a value into a target.
pub trait ValuePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether missing intermediate objects are created before writing.
    fn constructs(&self) -> bool;

    /// Writes `value`. Returns `false` when the write was refused or failed;
    /// the reason has been logged.
    fn apply(
        &self,
        document: &mut Document,
        target: &Target,
        value: Value,
        log: ScopedLogger<'_>,
    ) -> bool;
}

/// Inserts new properties and appends to arrays; never overwrites.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddPolicy;

/// Replaces existing values only.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetPolicy;

/// Inserts, appends to arrays, or replaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct PutPolicy;

impl ValuePolicy for AddPolicy {
    fn name(&self) -> &'static str {
        "add"
    }

    fn constructs(&self) -> bool {
        true
    }

    fn apply(
        &self,
        document: &mut Document,
        target: &Target,
        value: Value,
        log: ScopedLogger<'_>,
    ) -> bool {
        match target.occupant(document) {
            Occupant::Append => push(document, target.container, value, log),
            Occupant::Empty => insert(document, target, value, log),
            Occupant::Node(existing) if document.is_array(existing) => {
                push(document, existing, value, log)
            }
            Occupant::Node(existing) => {
                log.warn(format!(
                    "Add skipped: '{}' already holds a {} value",
                    target.describe(document),
                    document.node_type(existing)
                ));
                false
            }
        }
    }
}

impl ValuePolicy for SetPolicy {
    fn name(&self) -> &'static str {
        "set"
    }

    fn constructs(&self) -> bool {
        false
    }

    fn apply(
        &self,
        document: &mut Document,
        target: &Target,
        value: Value,
        log: ScopedLogger<'_>,
    ) -> bool {
        match target.occupant(document) {
            Occupant::Node(existing) => {
                document.replace(existing, value);
                log.info(format!("Set '{}'", target.describe(document)));
                true
            }
            Occupant::Empty => {
                log.warn(format!(
                    "Set skipped: '{}' does not exist",
                    target.describe(document)
                ));
                false
            }
            Occupant::Append => {
                log.warn(format!(
                    "Set skipped: '{}' is an array and set does not append",
                    document.describe(target.container)
                ));
                false
            }
        }
    }
}

impl ValuePolicy for PutPolicy {
    fn name(&self) -> &'static str {
        "put"
    }

    fn constructs(&self) -> bool {
        true
    }

    fn apply(
        &self,
        document: &mut Document,
        target: &Target,
        value: Value,
        log: ScopedLogger<'_>,
    ) -> bool {
        match target.occupant(document) {
            Occupant::Append => push(document, target.container, value, log),
            Occupant::Empty => insert(document, target, value, log),
            Occupant::Node(existing) if document.is_array(existing) => {
                push(document, existing, value, log)
            }
            Occupant::Node(existing) => {
                document.replace(existing, value);
                log.info(format!("Replaced '{}'", target.describe(document)));
                true
            }
        }
    }
}

fn push(document: &mut Document, array: NodeId, value: Value, log: ScopedLogger<'_>) -> bool {
    match document.push(array, value) {
        Ok(_) => {
            log.info(format!("Appended to '{}'", document.describe(array)));
            true
        }
        Err(e) => {
            log.warn(e.to_string());
            false
        }
    }
}

/// Creates the property a target names. An empty array slot cannot be created.
fn insert(document: &mut Document, target: &Target, value: Value, log: ScopedLogger<'_>) -> bool {
    match &target.slot {
        Slot::Property(name) => match document.set_property(target.container, name, value) {
            Ok(_) => {
                log.info(format!("Created '{}'", target.describe(document)));
                true
            }
            Err(e) => {
                log.warn(e.to_string());
                false
            }
        },
        Slot::Index(_) | Slot::Append => {
            log.warn(format!(
                "Cannot create array slot '{}'",
                target.describe(document)
            ));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmorph_context::{LogCategory, LogLevel, MemoryLogger};
    use serde_json::json;

    fn apply(
        policy: &dyn ValuePolicy,
        data: Value,
        name: &str,
        value: Value,
    ) -> (Value, bool, MemoryLogger) {
        let logger = MemoryLogger::new();
        let mut doc = Document::from_value(data);
        let target = Target::property(doc.root(), name);
        let ok = policy.apply(
            &mut doc,
            &target,
            value,
            ScopedLogger::new(&logger, LogCategory::Command),
        );
        (doc.to_value(), ok, logger)
    }

    #[test]
    fn test_add_never_overwrites_a_scalar() {
        let (doc, ok, logger) = apply(&AddPolicy, json!({"a": 1}), "a", json!(2));
        assert_eq!(doc, json!({"a": 1}));
        assert!(!ok);
        assert_eq!(logger.count(LogLevel::Warning), 1);
    }

    #[test]
    fn test_add_accumulates_into_arrays() {
        let (doc, ok, _) = apply(&AddPolicy, json!({"a": [1]}), "a", json!(2));
        assert_eq!(doc, json!({"a": [1, 2]}));
        assert!(ok);
    }

    #[test]
    fn test_set_never_creates() {
        let (doc, ok, logger) = apply(&SetPolicy, json!({}), "a", json!(1));
        assert_eq!(doc, json!({}));
        assert!(!ok);
        assert_eq!(logger.count(LogLevel::Warning), 1);

        let (doc, ok, _) = apply(&SetPolicy, json!({"a": [1]}), "a", json!(1));
        assert_eq!(doc, json!({"a": 1}));
        assert!(ok);
    }

    #[test]
    fn test_put_inserts_replaces_and_appends() {
        let (doc, _, _) = apply(&PutPolicy, json!({}), "a", json!(1));
        assert_eq!(doc, json!({"a": 1}));
        let (doc, _, _) = apply(&PutPolicy, doc, "a", json!(2));
        assert_eq!(doc, json!({"a": 2}));
        let (doc, _, _) = apply(&PutPolicy, json!({"a": ["x"]}), "a", json!("y"));
        assert_eq!(doc, json!({"a": ["x", "y"]}));
    }

    #[test]
    fn test_array_slots() {
        let logger = MemoryLogger::new();
        let log = ScopedLogger::new(&logger, LogCategory::Command);
        let mut doc = Document::from_value(json!({"xs": [1, 2]}));
        let xs = doc.property(doc.root(), "xs").unwrap();

        assert!(AddPolicy.apply(&mut doc, &Target::append(xs), json!(3), log));
        assert!(SetPolicy.apply(&mut doc, &Target::index(xs, 0), json!(0), log));
        assert!(!SetPolicy.apply(&mut doc, &Target::append(xs), json!(9), log));
        assert!(!PutPolicy.apply(&mut doc, &Target::index(xs, 7), json!(9), log));
        assert_eq!(doc.to_value(), json!({"xs": [0, 2, 3]}));
        assert_eq!(Target::index(xs, 1).describe(&doc), "$.xs[1]");
    }
}
