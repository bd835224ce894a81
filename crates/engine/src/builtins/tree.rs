//! Built-ins for tree nodes

use super::{BuiltinRegistry, Invocation};
use crate::dom::NodeKind;
use crate::error::EngineError;
use crate::model::{Capabilities, Value};

type Output = Result<Option<Value>, EngineError>;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    let node = Capabilities::TREE_NODE;
    registry.register_aliases(&["previousSibling", "previous_sibling"], node, previous_sibling);
    registry.register_aliases(&["nextSibling", "next_sibling"], node, next_sibling);
    registry.register_aliases(
        &["previousSignificantSibling", "previous_significant_sibling"],
        node,
        previous_significant_sibling,
    );
    registry.register_aliases(
        &["nextSignificantSibling", "next_significant_sibling"],
        node,
        next_significant_sibling,
    );
    registry.register("parent", node, parent);
    registry.register("children", node, children);
    registry.register("root", node, root);
    registry.register_aliases(&["node_name", "nodeName"], node, node_name);
    registry.register_aliases(&["node_type", "nodeType"], node, node_type);
}

fn previous_sibling(inv: &Invocation<'_>) -> Output {
    Ok(inv.node()?.previous_sibling()?.map(Value::Node))
}

fn next_sibling(inv: &Invocation<'_>) -> Output {
    Ok(inv.node()?.next_sibling()?.map(Value::Node))
}

fn previous_significant_sibling(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::NodeList(inv.node()?.previous_significant_sibling()?)))
}

fn next_significant_sibling(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::NodeList(inv.node()?.next_significant_sibling()?)))
}

fn parent(inv: &Invocation<'_>) -> Output {
    Ok(inv.node()?.parent().map(Value::Node))
}

fn children(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::NodeList(inv.node()?.children()?)))
}

fn root(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::Node(inv.node()?.root())))
}

fn node_name(inv: &Invocation<'_>) -> Output {
    let node = inv.node()?;
    let name = match (node.kind(), node.name()) {
        (NodeKind::Element | NodeKind::ProcessingInstruction, Some(name)) => name.to_string(),
        (kind, _) => format!("@{kind}"),
    };
    Ok(Some(Value::Text(name)))
}

fn node_type(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::Text(inv.node()?.kind().as_str().to_string())))
}
