//! `serde` support: a document serializes straight from the arena, without
//! first cloning it into a `serde_json::Value`.
use crate::{Document, NodeId, NodeKind};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.doc.kind(self.id) {
            NodeKind::Null => serializer.serialize_unit(),
            NodeKind::Bool(b) => serializer.serialize_bool(*b),
            NodeKind::Number(n) => n.serialize(serializer),
            NodeKind::String(s) => serializer.serialize_str(s),
            NodeKind::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for id in items {
                    seq.serialize_element(&NodeRef { doc: self.doc, id: *id })?;
                }
                seq.end()
            }
            NodeKind::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, id) in entries {
                    map.serialize_entry(name, &NodeRef { doc: self.doc, id: *id })?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRef { doc: self, id: self.root() }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Document::from_value)
    }
}
