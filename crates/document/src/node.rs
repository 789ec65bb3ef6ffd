//! Node payloads and identifiers stored in the document arena.
use indexmap::IndexMap;
use serde_json::Number;
use std::fmt;

/// A stable handle to a node in a [`Document`](crate::Document).
///
/// Ids are never reused: a detached node keeps its id, it is simply no longer
/// reachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The raw arena slot of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The payload of a node. Containers hold the ids of their children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<NodeId>),
    Object(IndexMap<String, NodeId>),
}

/// The JSON type of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Null => NodeType::Null,
            NodeKind::Bool(_) => NodeType::Bool,
            NodeKind::Number(_) => NodeType::Number,
            NodeKind::String(_) => NodeType::String,
            NodeKind::Array(_) => NodeType::Array,
            NodeKind::Object(_) => NodeType::Object,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Null => "null",
            NodeType::Bool => "boolean",
            NodeType::Number => "number",
            NodeType::String => "string",
            NodeType::Array => "array",
            NodeType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Where a node sits inside its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// The document root.
    Root,
    /// A property of an object.
    Property(String),
    /// An element of an array. Indexes shift when earlier siblings are removed.
    Index(usize),
    /// The node was removed from the tree.
    Detached,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}
