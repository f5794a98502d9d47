//! Document tree for the Bramble engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships. Nodes are owned by the arena; every other tree in the
//! pipeline (styled tree, layout tree) refers back into the document by
//! `NodeId` and must be discarded before the `DomTree` is.
//!
//! A node is a closed variant of element or text; there is no runtime
//! downcasting anywhere in the pipeline, only exhaustive matching.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// Tag name of the synthetic list-bullet element injected before `li` content.
pub const TAG_BULLET: &str = "bullet";
/// Pseudo tag name reported for text nodes.
pub const TAG_TEXT: &str = "text";

/// Elements that carry document metadata and are never displayed.
const METADATA_TAGS: &[&str] = &["head", "style", "link", "meta"];

/// A type-safe index into the document tree.
///
/// `NodeId` is the non-owning reference other trees hold into the document:
/// copying one is free and never extends the arena's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always the first one allocated.
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the document tree.
///
/// Children are stored as arena indices in document order.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// The closed set of node kinds.
///
/// Every consumer matches exhaustively on this; a text node can never be
/// mistaken for an element at runtime.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// A named element with attributes.
    Element(ElementData),
    /// A run of raw text.
    Text(String),
}

/// Element-specific data: tag name plus attribute list.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's tag name, lowercased by the parser.
    pub tag_name: String,
    /// The element's attributes.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data from a tag name and attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
        }
    }

    /// Return the named attribute, or `default` when absent.
    #[must_use]
    pub fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attrs.get(name).map_or(default, String::as_str)
    }

    /// The element's `id` attribute value, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// The whitespace-separated class names from the `class` attribute.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        match self.attrs.get("class") {
            Some(list) => list.split_whitespace().collect(),
            None => Vec::new(),
        }
    }

    /// Whether this element is drawn to the screen, as opposed to metadata
    /// carriers like `head` or `meta`.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !METADATA_TAGS.contains(&self.tag_name.as_str())
    }
}

/// Arena-based document tree.
///
/// All nodes live in a contiguous vector; `NodeId` indices provide O(1)
/// access without borrow gymnastics. The tree is immutable once the parser
/// hands it over.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create an empty tree. The first node allocated becomes the root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its id. The node starts detached.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    /// Children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The element data of a node, when it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// The text content of a node, when it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The tag name of a node: the element's own tag, or `"text"` for text
    /// nodes.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> &str {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(data)) => data.tag_name.as_str(),
            _ => TAG_TEXT,
        }
    }
}
