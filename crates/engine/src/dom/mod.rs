//! Document trees exposed to templates
//!
//! Templates never see a concrete DOM. They navigate through `NodeRef`,
//! an immutable view over anything implementing `ForeignTree`. `Document`
//! is the in-memory arena shipped with the engine; XML loaders build one
//! with `DocumentBuilder`.

mod node;
mod significance;

pub use node::NodeRef;
pub use significance::{classify, Significance};

use std::fmt;
use std::sync::Arc;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Element => "element",
            Self::Text => "text",
            Self::CData => "cdata",
            Self::Comment => "comment",
            Self::ProcessingInstruction => "pi",
        }
    }

    /// Text, CDATA, comments and PIs carry character data of their own
    pub fn has_data(self) -> bool {
        matches!(self, Self::Text | Self::CData | Self::Comment | Self::ProcessingInstruction)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque node handle, meaningful only for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// A document owned by someone else, read through node handles.
///
/// Implementations answer structural questions only; the adapter layer
/// (`NodeRef`) checks that parent and child links agree.
pub trait ForeignTree: Send + Sync + fmt::Debug {
    fn kind(&self, id: NodeId) -> NodeKind;

    /// Element name or PI target
    fn name(&self, id: NodeId) -> Option<&str>;

    /// Character data of text, CDATA, comment and PI nodes
    fn text(&self, id: NodeId) -> Option<&str>;

    fn parent(&self, id: NodeId) -> Option<NodeId>;

    fn children(&self, id: NodeId) -> &[NodeId];

    fn attribute(&self, _id: NodeId, _name: &str) -> Option<&str> {
        None
    }

    fn root(&self) -> NodeId;
}

// ============================================================================
// In-memory document
// ============================================================================

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    name: Option<String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
}

impl NodeData {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name: None,
            text: None,
            parent,
            children: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

/// Arena-backed document. Node 0 is the document node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Number of nodes below the document node
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Share the document and return its document node
    pub fn into_root(self) -> NodeRef {
        let tree: Arc<dyn ForeignTree> = Arc::new(self);
        let root = tree.root();
        NodeRef::new(tree, root)
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }
}

impl ForeignTree for Document {
    fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).map_or(NodeKind::Document, |n| n.kind)
    }

    fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.name.as_deref()
    }

    fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.text.as_deref()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }
}

/// Builds a `Document` from a stream of parse events.
///
/// Adjacent text is merged into one text node. CDATA sections always get
/// their own node. Whitespace outside the document element is dropped.
#[derive(Debug)]
pub struct DocumentBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document, None)],
            open: vec![NodeId(0)],
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId(0))
    }

    fn at_document_level(&self) -> bool {
        self.open.len() == 1
    }

    fn push(&mut self, mut data: NodeData) -> NodeId {
        let parent = self.current();
        data.parent = Some(parent);
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn start_element(&mut self, name: &str, attributes: Vec<(String, String)>) -> NodeId {
        let mut data = NodeData::new(NodeKind::Element, None);
        data.name = Some(name.to_string());
        data.attributes = attributes;
        let id = self.push(data);
        self.open.push(id);
        id
    }

    pub fn end_element(&mut self, name: &str) -> Result<(), EngineError> {
        if self.at_document_level() {
            return Err(EngineError::Document(format!("unexpected end tag </{name}>")));
        }
        let current = self.current();
        let open_name = self.nodes[current.0].name.as_deref().unwrap_or_default();
        if open_name != name {
            return Err(EngineError::Document(format!(
                "end tag </{name}> does not match <{open_name}>"
            )));
        }
        self.open.pop();
        Ok(())
    }

    pub fn text(&mut self, content: &str) -> Result<(), EngineError> {
        if content.is_empty() {
            return Ok(());
        }
        if self.at_document_level() {
            if content.trim().is_empty() {
                return Ok(());
            }
            return Err(EngineError::Document("text outside the document element".to_string()));
        }

        let parent = self.current();
        if let Some(&last) = self.nodes[parent.0].children.last() {
            let last = &mut self.nodes[last.0];
            if last.kind == NodeKind::Text {
                last.text.get_or_insert_with(String::new).push_str(content);
                return Ok(());
            }
        }
        let mut data = NodeData::new(NodeKind::Text, None);
        data.text = Some(content.to_string());
        self.push(data);
        Ok(())
    }

    pub fn cdata(&mut self, content: &str) -> Result<(), EngineError> {
        if self.at_document_level() {
            return Err(EngineError::Document("CDATA outside the document element".to_string()));
        }
        let mut data = NodeData::new(NodeKind::CData, None);
        data.text = Some(content.to_string());
        self.push(data);
        Ok(())
    }

    pub fn comment(&mut self, content: &str) {
        let mut data = NodeData::new(NodeKind::Comment, None);
        data.text = Some(content.to_string());
        self.push(data);
    }

    pub fn processing_instruction(&mut self, target: &str, content: &str) {
        let mut data = NodeData::new(NodeKind::ProcessingInstruction, None);
        data.name = Some(target.to_string());
        data.text = Some(content.to_string());
        self.push(data);
    }

    pub fn finish(self) -> Result<Document, EngineError> {
        if let Some(&unclosed) = self.open.get(1) {
            let name = self.nodes[unclosed.0].name.clone().unwrap_or_default();
            return Err(EngineError::Document(format!("element <{name}> is never closed")));
        }
        Ok(Document { nodes: self.nodes })
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
