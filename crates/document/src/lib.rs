//! A mutable, tree-shaped JSON document.
//!
//! Nodes live in an arena and are addressed by stable [`NodeId`]s. Every node
//! stores the id of its parent, so a node can report its position and full
//! path without the tree holding owning back-pointers. Removing a node only
//! unlinks it: its id stays valid (and detached) for the lifetime of the
//! document, which lets callers keep node sets across mutations.

mod error;
mod node;
mod serialize;

pub use error::DocumentError;
pub use node::{NodeId, NodeKind, NodeType, Position};

use indexmap::IndexMap;
use node::Node;
use serde_json::{Map, Value};
use std::fmt;

/// An in-memory JSON document that can be navigated upwards and edited in place.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    /// An empty object document.
    fn default() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }
}

impl Document {
    /// Creates an empty object document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a `serde_json::Value`.
    pub fn from_value(value: Value) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.import(value);
        doc
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots in use, including detached nodes.
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    // --- Navigation ---

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.kind(id).node_type()
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Object(_))
    }

    pub fn is_array(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Array(_))
    }

    pub fn as_object(&self, id: NodeId) -> Option<&IndexMap<String, NodeId>> {
        match self.kind(id) {
            NodeKind::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.kind(id) {
            NodeKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// The child of an object with the given property name.
    pub fn property(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.as_object(id)?.get(name).copied()
    }

    /// The element of an array at `index`.
    pub fn element(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.as_array(id)?.get(index).copied()
    }

    /// The direct children of a container in document order; empty for scalars.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Array(items) => items.clone(),
            NodeKind::Object(map) => map.values().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Number of children of a container; zero for scalars.
    pub fn len(&self, id: NodeId) -> usize {
        match self.kind(id) {
            NodeKind::Array(items) => items.len(),
            NodeKind::Object(map) => map.len(),
            _ => 0,
        }
    }

    /// Every node below `id`, in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        result
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// True if the node can be reached from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The position of a node inside its parent.
    pub fn position(&self, id: NodeId) -> Position {
        if id == self.root {
            return Position::Root;
        }
        let Some(parent) = self.parent(id) else {
            return Position::Detached;
        };
        match self.kind(parent) {
            NodeKind::Object(map) => map
                .iter()
                .find(|(_, child)| **child == id)
                .map(|(name, _)| Position::Property(name.clone()))
                .unwrap_or(Position::Detached),
            NodeKind::Array(items) => items
                .iter()
                .position(|child| *child == id)
                .map(Position::Index)
                .unwrap_or(Position::Detached),
            _ => Position::Detached,
        }
    }

    /// The normalized address of a node, e.g. `$.orders[2]['unit price']`.
    /// Returns `None` for detached nodes.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = id;
        loop {
            match self.position(current) {
                Position::Root => break,
                Position::Detached => return None,
                Position::Property(name) => segments.push(render_name(&name)),
                Position::Index(index) => segments.push(format!("[{}]", index)),
            }
            current = self.parent(current)?;
        }
        segments.reverse();
        Some(format!("${}", segments.concat()))
    }

    /// The address of a node for diagnostics, or its id when detached.
    pub fn describe(&self, id: NodeId) -> String {
        self.path_of(id).unwrap_or_else(|| id.to_string())
    }

    /// Clones the subtree at `id` into a `serde_json::Value`.
    pub fn value(&self, id: NodeId) -> Value {
        match self.kind(id) {
            NodeKind::Null => Value::Null,
            NodeKind::Bool(b) => Value::Bool(*b),
            NodeKind::Number(n) => Value::Number(n.clone()),
            NodeKind::String(s) => Value::String(s.clone()),
            NodeKind::Array(items) => Value::Array(items.iter().map(|c| self.value(*c)).collect()),
            NodeKind::Object(map) => Value::Object(
                map.iter()
                    .map(|(name, child)| (name.clone(), self.value(*child)))
                    .collect(),
            ),
        }
    }

    /// Clones the whole document into a `serde_json::Value`.
    pub fn to_value(&self) -> Value {
        self.value(self.root)
    }

    // --- Mutation ---

    /// Adds a detached subtree built from `value` and returns its id.
    pub fn import(&mut self, value: Value) -> NodeId {
        let id = self.alloc(None);
        self.fill(id, value);
        id
    }

    /// Replaces the payload of `id` in place. The node keeps its id and its
    /// position; its previous children become detached.
    pub fn replace(&mut self, id: NodeId, value: Value) {
        for child in self.children(id) {
            self.nodes[child.0].parent = None;
        }
        self.fill(id, value);
    }

    /// Sets an object property, replacing the existing value in place if present.
    pub fn set_property(
        &mut self,
        object: NodeId,
        name: &str,
        value: Value,
    ) -> Result<NodeId, DocumentError> {
        self.expect_object(object)?;
        if let Some(existing) = self.property(object, name) {
            self.replace(existing, value);
            return Ok(existing);
        }
        let child = self.alloc(Some(object));
        self.fill(child, value);
        if let NodeKind::Object(map) = &mut self.nodes[object.0].kind {
            map.insert(name.to_string(), child);
        }
        Ok(child)
    }

    /// Appends a value to an array.
    pub fn push(&mut self, array: NodeId, value: Value) -> Result<NodeId, DocumentError> {
        self.expect_array(array)?;
        let child = self.alloc(Some(array));
        self.fill(child, value);
        if let NodeKind::Array(items) = &mut self.nodes[array.0].kind {
            items.push(child);
        }
        Ok(child)
    }

    /// Replaces the array element at `index`.
    pub fn set_element(
        &mut self,
        array: NodeId,
        index: usize,
        value: Value,
    ) -> Result<NodeId, DocumentError> {
        self.expect_array(array)?;
        let len = self.len(array);
        let Some(existing) = self.element(array, index) else {
            return Err(DocumentError::IndexOutOfBounds {
                path: self.describe(array),
                index,
                len,
            });
        };
        self.replace(existing, value);
        Ok(existing)
    }

    /// Unlinks a node from its parent and returns its value. Array siblings
    /// after it are renumbered.
    pub fn detach(&mut self, id: NodeId) -> Result<Value, DocumentError> {
        if id == self.root {
            return Err(DocumentError::DetachRoot);
        }
        let Some(parent) = self.parent(id) else {
            return Err(DocumentError::Detached(id.to_string()));
        };
        match &mut self.nodes[parent.0].kind {
            NodeKind::Object(map) => {
                let name = map
                    .iter()
                    .find(|(_, child)| **child == id)
                    .map(|(name, _)| name.clone());
                if let Some(name) = name {
                    map.shift_remove(&name);
                }
            }
            NodeKind::Array(items) => items.retain(|child| *child != id),
            _ => {}
        }
        self.nodes[id.0].parent = None;
        Ok(self.value(id))
    }

    // --- Internals ---

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn alloc(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            kind: NodeKind::Null,
        });
        id
    }

    fn fill(&mut self, id: NodeId, value: Value) {
        let kind = match value {
            Value::Null => NodeKind::Null,
            Value::Bool(b) => NodeKind::Bool(b),
            Value::Number(n) => NodeKind::Number(n),
            Value::String(s) => NodeKind::String(s),
            Value::Array(items) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    let child = self.alloc(Some(id));
                    self.fill(child, item);
                    children.push(child);
                }
                NodeKind::Array(children)
            }
            Value::Object(map) => {
                let mut children = IndexMap::with_capacity(map.len());
                for (name, item) in map {
                    let child = self.alloc(Some(id));
                    self.fill(child, item);
                    children.insert(name, child);
                }
                NodeKind::Object(children)
            }
        };
        self.nodes[id.0].kind = kind;
    }

    fn expect_object(&self, id: NodeId) -> Result<(), DocumentError> {
        if self.is_object(id) {
            Ok(())
        } else {
            Err(DocumentError::NotAnObject {
                path: self.describe(id),
                found: self.node_type(id),
            })
        }
    }

    fn expect_array(&self, id: NodeId) -> Result<(), DocumentError> {
        if self.is_array(id) {
            Ok(())
        } else {
            Err(DocumentError::NotAnArray {
                path: self.describe(id),
                found: self.node_type(id),
            })
        }
    }
}

/// Renders a property name as a path segment, using bracket notation when the
/// name is not a plain identifier.
fn render_name(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if plain {
        format!(".{}", name)
    } else {
        format!("['{}']", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::from_value(value)
    }
}

impl From<&Document> for Value {
    fn from(doc: &Document) -> Self {
        doc.to_value()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_structure() {
        let value = json!({ "a": [1, { "b": null }], "c": "text", "d": true });
        let doc = Document::from_value(value.clone());
        assert_eq!(doc.to_value(), value);
    }

    #[test]
    fn test_parent_and_position() {
        let doc = Document::from_value(json!({ "orders": [{ "id": 1 }, { "id": 2 }] }));
        let orders = doc.property(doc.root(), "orders").unwrap();
        let second = doc.element(orders, 1).unwrap();
        let id = doc.property(second, "id").unwrap();

        assert_eq!(doc.parent(id), Some(second));
        assert_eq!(doc.position(second), Position::Index(1));
        assert_eq!(doc.position(id), Position::Property("id".to_string()));
        assert_eq!(doc.position(doc.root()), Position::Root);
        assert_eq!(doc.path_of(id).as_deref(), Some("$.orders[1].id"));
        assert_eq!(doc.path_of(doc.root()).as_deref(), Some("$"));
    }

    #[test]
    fn test_path_of_uses_brackets_for_unusual_names() {
        let doc = Document::from_value(json!({ "unit price": { "it's": 1 } }));
        let price = doc.property(doc.root(), "unit price").unwrap();
        let inner = doc.property(price, "it's").unwrap();
        assert_eq!(doc.path_of(inner).as_deref(), Some("$['unit price']['it\\'s']"));
    }

    #[test]
    fn test_set_property_inserts_and_replaces_in_place() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.set_property(root, "a", json!(1)).unwrap();
        let again = doc.set_property(root, "a", json!({ "x": 2 })).unwrap();
        assert_eq!(a, again);
        assert_eq!(doc.to_value(), json!({ "a": { "x": 2 } }));
    }

    #[test]
    fn test_set_property_on_array_fails() {
        let mut doc = Document::from_value(json!([1]));
        let err = doc.set_property(doc.root(), "a", json!(1)).unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject { .. }));
    }

    #[test]
    fn test_detach_renumbers_array_elements() {
        let mut doc = Document::from_value(json!({ "list": ["a", "b", "c"] }));
        let list = doc.property(doc.root(), "list").unwrap();
        let b = doc.element(list, 1).unwrap();
        let c = doc.element(list, 2).unwrap();

        assert_eq!(doc.detach(b).unwrap(), json!("b"));
        assert_eq!(doc.position(c), Position::Index(1));
        assert_eq!(doc.position(b), Position::Detached);
        assert!(!doc.is_attached(b));
        assert_eq!(doc.to_value(), json!({ "list": ["a", "c"] }));
    }

    #[test]
    fn test_detach_root_and_twice() {
        let mut doc = Document::from_value(json!({ "a": 1 }));
        assert_eq!(doc.detach(doc.root()), Err(DocumentError::DetachRoot));
        let a = doc.property(doc.root(), "a").unwrap();
        doc.detach(a).unwrap();
        assert!(matches!(doc.detach(a), Err(DocumentError::Detached(_))));
    }

    #[test]
    fn test_replace_detaches_old_children() {
        let mut doc = Document::from_value(json!({ "a": { "b": 1 } }));
        let a = doc.property(doc.root(), "a").unwrap();
        let b = doc.property(a, "b").unwrap();
        doc.replace(a, json!([true]));
        assert!(!doc.is_attached(b));
        assert_eq!(doc.to_value(), json!({ "a": [true] }));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = Document::from_value(json!({ "a": { "b": 1 }, "c": [2] }));
        let values: Vec<Value> = doc
            .descendants(doc.root())
            .into_iter()
            .map(|id| doc.value(id))
            .collect();
        assert_eq!(
            values,
            vec![json!({ "b": 1 }), json!(1), json!([2]), json!(2)]
        );
    }

    #[test]
    fn test_object_order_is_insertion_order() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_property(root, "z", json!(1)).unwrap();
        doc.set_property(root, "a", json!(2)).unwrap();
        assert_eq!(doc.to_string(), r#"{"z":1,"a":2}"#);
    }
}
