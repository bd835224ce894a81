//! `NodeRef`: an immutable, cheaply cloned view of one node of a foreign tree

use std::fmt;
use std::sync::Arc;

use super::significance::{classify, Significance};
use super::{ForeignTree, NodeId, NodeKind};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

#[derive(Clone)]
pub struct NodeRef {
    tree: Arc<dyn ForeignTree>,
    id: NodeId,
}

impl NodeRef {
    pub fn new(tree: Arc<dyn ForeignTree>, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn at(&self, id: NodeId) -> NodeRef {
        NodeRef {
            tree: Arc::clone(&self.tree),
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.kind(self.id)
    }

    pub fn name(&self) -> Option<&str> {
        self.tree.name(self.id)
    }

    /// Raw character data of text-bearing nodes
    pub fn data(&self) -> Option<&str> {
        self.tree.text(self.id)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.tree.attribute(self.id, name)
    }

    pub fn root(&self) -> NodeRef {
        self.at(self.tree.root())
    }

    /// Parent node, `None` for the document node
    pub fn parent(&self) -> Option<NodeRef> {
        self.tree.parent(self.id).map(|p| self.at(p))
    }

    pub fn significance(&self) -> Significance {
        classify(self.kind(), self.data())
    }

    pub fn is_significant(&self) -> bool {
        self.significance() == Significance::Significant
    }

    /// Text of a text-bearing node; concatenated descendant text and CDATA
    /// for elements and documents.
    pub fn text_content(&self) -> String {
        if self.kind().has_data() {
            return self.data().unwrap_or_default().to_string();
        }
        let mut out = String::new();
        collect_text(self.tree.as_ref(), self.id, &mut out);
        out
    }

    /// Children in document order, each checked to name this node as parent
    pub fn children(&self) -> Result<Vec<NodeRef>, EngineError> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&child| {
                if self.tree.parent(child) == Some(self.id) {
                    Ok(self.at(child))
                } else {
                    Err(self.at(child).malformed(format!(
                        "listed as a child of {} but names a different parent",
                        self.describe()
                    )))
                }
            })
            .collect()
    }

    /// Child elements with the given name (`*` matches any element)
    pub fn child_elements(&self, name: &str) -> Result<Vec<NodeRef>, EngineError> {
        Ok(self
            .children()?
            .into_iter()
            .filter(|c| c.kind() == NodeKind::Element && (name == "*" || c.name() == Some(name)))
            .collect())
    }

    pub fn previous_sibling(&self) -> Result<Option<NodeRef>, EngineError> {
        self.adjacent(Direction::Backward)
    }

    pub fn next_sibling(&self) -> Result<Option<NodeRef>, EngineError> {
        self.adjacent(Direction::Forward)
    }

    /// Closest preceding significant sibling, as a zero- or one-node list
    pub fn previous_significant_sibling(&self) -> Result<Vec<NodeRef>, EngineError> {
        self.significant(Direction::Backward)
    }

    /// Closest following significant sibling, as a zero- or one-node list
    pub fn next_significant_sibling(&self) -> Result<Vec<NodeRef>, EngineError> {
        self.significant(Direction::Forward)
    }

    fn adjacent(&self, direction: Direction) -> Result<Option<NodeRef>, EngineError> {
        let Some((siblings, index)) = self.position()? else {
            return Ok(None);
        };
        let next = match direction {
            Direction::Backward => index.checked_sub(1),
            Direction::Forward => Some(index + 1),
        };
        Ok(next.and_then(|i| siblings.get(i)).map(|&id| self.at(id)))
    }

    fn significant(&self, direction: Direction) -> Result<Vec<NodeRef>, EngineError> {
        let Some((siblings, index)) = self.position()? else {
            return Ok(Vec::new());
        };
        let candidates: Box<dyn Iterator<Item = &NodeId>> = match direction {
            Direction::Backward => Box::new(siblings[..index].iter().rev()),
            Direction::Forward => Box::new(siblings[index + 1..].iter()),
        };
        Ok(candidates
            .map(|&id| self.at(id))
            .find(NodeRef::is_significant)
            .into_iter()
            .collect())
    }

    /// Sibling list and this node's index in it; `None` without a parent
    fn position(&self) -> Result<Option<(&[NodeId], usize)>, EngineError> {
        let Some(parent) = self.tree.parent(self.id) else {
            return Ok(None);
        };
        let siblings = self.tree.children(parent);
        match siblings.iter().position(|&id| id == self.id) {
            Some(index) => Ok(Some((siblings, index))),
            None => {
                log::warn!("{} is missing from its parent's child list", self.describe());
                Err(self.malformed(format!(
                    "parent {} does not list it as a child",
                    self.at(parent).describe()
                )))
            }
        }
    }

    fn malformed(&self, reason: String) -> EngineError {
        EngineError::MalformedDocumentReference {
            node: self.describe(),
            reason,
        }
    }

    /// Short description for diagnostics, e.g. `element <name> (#3)`
    pub fn describe(&self) -> String {
        match (self.kind(), self.name()) {
            (NodeKind::Element, Some(name)) => format!("element <{name}> (#{})", self.id.index()),
            (kind, _) => format!("{kind} node (#{})", self.id.index()),
        }
    }
}

fn collect_text(tree: &dyn ForeignTree, id: NodeId, out: &mut String) {
    for &child in tree.children(id) {
        match tree.kind(child) {
            NodeKind::Text | NodeKind::CData => out.push_str(tree.text(child).unwrap_or_default()),
            NodeKind::Element => collect_text(tree, child, out),
            _ => {}
        }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.tree), Arc::as_ptr(&other.tree)) && self.id == other.id
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::DocumentBuilder;

    use super::*;

    /// <list><!--c--> <a/>text<![CDATA[ ]]><b/></list>
    fn sample() -> NodeRef {
        let mut b = DocumentBuilder::new();
        b.start_element("list", Vec::new());
        b.comment("c");
        b.text(" ").unwrap();
        b.start_element("a", Vec::new());
        b.end_element("a").unwrap();
        b.text("text").unwrap();
        b.cdata(" ").unwrap();
        b.start_element("b", Vec::new());
        b.end_element("b").unwrap();
        b.end_element("list").unwrap();
        b.finish().unwrap().into_root()
    }

    fn only(nodes: Vec<NodeRef>) -> NodeRef {
        assert_eq!(nodes.len(), 1, "{nodes:?}");
        nodes.into_iter().next().unwrap()
    }

    #[test]
    fn adjacent_siblings_ignore_significance() {
        let list = only(sample().child_elements("list").unwrap());
        let a = only(list.child_elements("a").unwrap());

        let prev = a.previous_sibling().unwrap().unwrap();
        assert_eq!(prev.kind(), NodeKind::Text);
        assert_eq!(prev.text_content(), " ");

        let first = prev.previous_sibling().unwrap().unwrap();
        assert_eq!(first.kind(), NodeKind::Comment);
        assert_eq!(first.previous_sibling().unwrap(), None);
    }

    #[test]
    fn significant_siblings_skip_blank_and_comments() {
        let list = only(sample().child_elements("list").unwrap());
        let a = only(list.child_elements("a").unwrap());
        let b = only(list.child_elements("b").unwrap());

        assert!(a.previous_significant_sibling().unwrap().is_empty());
        assert_eq!(only(a.next_significant_sibling().unwrap()).text_content(), "text");
        assert_eq!(only(b.previous_significant_sibling().unwrap()).text_content(), "text");
        assert!(b.next_significant_sibling().unwrap().is_empty());
    }

    #[test]
    fn document_node_has_no_siblings() {
        let root = sample();
        assert_eq!(root.parent(), None);
        assert_eq!(root.next_sibling().unwrap(), None);
        assert!(root.previous_significant_sibling().unwrap().is_empty());
        assert_eq!(root.root(), root);
        assert_eq!(root.text_content(), " text ");
    }

    #[test]
    fn star_matches_every_element() {
        let list = only(sample().child_elements("*").unwrap());
        let names: Vec<_> = list
            .child_elements("*")
            .unwrap()
            .iter()
            .map(|n| n.name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
