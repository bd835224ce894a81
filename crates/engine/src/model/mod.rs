//! Template data model
//!
//! Values carry a set of capabilities; built-ins are looked up by capability,
//! never by inspecting the concrete variant.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

use crate::dom::NodeRef;

bitflags::bitflags! {
    /// What a value can be used as.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const SCALAR    = 1 << 0;
        const NUMERIC   = 1 << 1;
        const BOOLEAN   = 1 << 2;
        const DATE_LIKE = 1 << 3;
        const MAPPING   = 1 << 4;
        const SEQUENCE  = 1 << 5;
        const TREE_NODE = 1 << 6;
    }
}

impl Capabilities {
    /// Order in which a value's capabilities are tried during dispatch
    pub const PRECEDENCE: [Capabilities; 7] = [
        Capabilities::TREE_NODE,
        Capabilities::SEQUENCE,
        Capabilities::MAPPING,
        Capabilities::DATE_LIKE,
        Capabilities::BOOLEAN,
        Capabilities::NUMERIC,
        Capabilities::SCALAR,
    ];

    /// Single capabilities of this set, most preferred first
    pub fn by_precedence(self) -> impl Iterator<Item = Capabilities> {
        Self::PRECEDENCE.into_iter().filter(move |c| self.contains(*c))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Hash(BTreeMap<String, Value>),
    Sequence(Vec<Value>),
    Node(NodeRef),
    /// Result of a node query; behaves as a node when it holds exactly one
    NodeList(Vec<NodeRef>),
}

impl Value {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Value::Text(_) => Capabilities::SCALAR,
            Value::Number(_) => Capabilities::NUMERIC,
            Value::Boolean(_) => Capabilities::BOOLEAN,
            Value::DateTime(_) => Capabilities::DATE_LIKE,
            Value::Hash(_) => Capabilities::MAPPING,
            Value::Sequence(_) => Capabilities::SEQUENCE,
            Value::Node(_) => Capabilities::TREE_NODE | Capabilities::SCALAR,
            Value::NodeList(nodes) if nodes.len() == 1 => {
                Capabilities::SEQUENCE | Capabilities::TREE_NODE | Capabilities::SCALAR
            }
            Value::NodeList(_) => Capabilities::SEQUENCE,
        }
    }

    /// Name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "string",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "date-time",
            Value::Hash(_) => "hash",
            Value::Sequence(_) => "sequence",
            Value::Node(_) => "node",
            Value::NodeList(_) => "node list",
        }
    }

    /// The node of a node, or of a node list holding exactly one
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(node) => Some(node),
            Value::NodeList(nodes) if nodes.len() == 1 => nodes.first(),
            _ => None,
        }
    }

    /// Text of a scalar: strings as-is, nodes by their text content
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            _ => self.as_node().map(NodeRef::text_content),
        }
    }

    /// Items of a sequence; node lists yield one node value per node
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items.clone()),
            Value::NodeList(nodes) => Some(nodes.iter().cloned().map(Value::Node).collect()),
            _ => None,
        }
    }

    /// Convert JSON data; `null` has no counterpart and yields `None`.
    ///
    /// Object members and array items that are `null` are dropped.
    pub fn from_json(json: serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
            serde_json::Value::String(s) => Some(Value::Text(s)),
            serde_json::Value::Array(items) => {
                Some(Value::Sequence(items.into_iter().filter_map(Value::from_json).collect()))
            }
            serde_json::Value::Object(map) => Some(Value::Hash(
                map.into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        f.write_str(&names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentBuilder;

    fn element() -> NodeRef {
        let mut b = DocumentBuilder::new();
        b.start_element("a", Vec::new());
        b.text("hi").unwrap();
        b.end_element("a").unwrap();
        let root = b.finish().unwrap().into_root();
        root.child_elements("a").unwrap().remove(0)
    }

    #[test]
    fn node_lists_act_as_nodes_only_when_single() {
        let node = element();
        let single = Value::NodeList(vec![node.clone()]);
        let pair = Value::NodeList(vec![node.clone(), node.clone()]);

        assert!(single.capabilities().contains(Capabilities::TREE_NODE | Capabilities::SEQUENCE));
        assert_eq!(pair.capabilities(), Capabilities::SEQUENCE);
        assert_eq!(Value::NodeList(Vec::new()).capabilities(), Capabilities::SEQUENCE);
        assert_eq!(single.scalar_text().as_deref(), Some("hi"));
        assert_eq!(pair.as_node(), None);
    }

    #[test]
    fn precedence_puts_tree_node_first() {
        let caps = Value::Node(element()).capabilities();
        let order: Vec<_> = caps.by_precedence().collect();
        assert_eq!(order, vec![Capabilities::TREE_NODE, Capabilities::SCALAR]);
    }

    #[test]
    fn json_conversion_drops_nulls() {
        let json = serde_json::json!({ "a": 1, "b": null, "c": [true, null, "x"] });
        let Some(Value::Hash(map)) = Value::from_json(json) else {
            panic!("expected hash");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], Value::Number(1.0));
        assert_eq!(
            map["c"],
            Value::Sequence(vec![Value::Boolean(true), Value::Text("x".into())])
        );
    }
}
