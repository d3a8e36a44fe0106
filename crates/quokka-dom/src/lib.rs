//! Markup node tree for the Quokka compiler.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! A parent owns its ordered child list; the parent link stored on each node is
//! a plain index used for navigation and tree rewrites, never for ownership.
//! Sibling relationships are derived from the parent's child list, so a
//! rewrite such as [`DomTree::replace_with`] only touches the parent's list and
//! the parent links of the moved nodes.
//!
//! Detached nodes stay in the arena; they are unreachable from the root and
//! ignored by every traversal.

mod attributes;
mod serialize;

pub use attributes::AttributesMap;

/// A type-safe index into a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Reserved name reported by [`DomTree::node_name`] for text leaves.
pub const TEXT_NODE_NAME: &str = "#text";
/// Reserved name reported by [`DomTree::node_name`] for CDATA leaves.
pub const CDATA_NODE_NAME: &str = "#cdata-section";
/// Reserved name reported by [`DomTree::node_name`] for comment leaves.
pub const COMMENT_NODE_NAME: &str = "#comment";
/// Reserved name reported by [`DomTree::node_name`] for the document node.
pub const DOCUMENT_NODE_NAME: &str = "#document";

/// One arena slot.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,
    /// Index of the owning parent, `None` for the root or detached nodes.
    pub parent: Option<NodeId>,
    /// Ordered children.
    pub children: Vec<NodeId>,
}

/// Node kinds. Leaves carry only text.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The tree root.
    Document,
    /// A tag with attributes and children.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// Opaque character data that serializes verbatim.
    CData(String),
    /// A comment.
    Comment(String),
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name exactly as written.
    pub tag_name: String,
    /// Ordered attributes.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Element with no attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Whitespace-separated tokens of the class attribute, in order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }
}

/// Arena-based node tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes, indexed by `NodeId`. The document node is at index 0.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of arena slots, detached nodes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag_name: &str, attrs: AttributesMap) -> NodeId {
        self.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
            attrs,
        }))
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// A child that is still attached elsewhere is detached first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove `child` from `parent`'s child list. No-op if it is not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        if let Some(index) = children.iter().position(|&c| c == child) {
            let _ = children.remove(index);
            self.nodes[child.0].parent = None;
        }
    }

    /// Detach `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }

    /// Replace `id` in its parent's child list by `replacements`, in order.
    ///
    /// Only the parent's child list and the replacements' parent links change.
    /// `id` ends up detached. Returns false when `id` has no parent.
    pub fn replace_with(&mut self, id: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        for &r in replacements {
            self.detach(r);
        }
        let children = &mut self.nodes[parent.0].children;
        let Some(index) = children.iter().position(|&c| c == id) else {
            return false;
        };
        let _ = children.splice(index..=index, replacements.iter().copied());
        self.nodes[id.0].parent = None;
        for &r in replacements {
            self.nodes[r.0].parent = Some(parent);
        }
        true
    }

    /// Deep-copy the subtree rooted at `source_id` in `source` into this
    /// tree. The copy is detached; its new ID is returned.
    pub fn import_subtree(&mut self, source: &Self, source_id: NodeId) -> NodeId {
        let node_type = source.nodes[source_id.0].node_type.clone();
        let copy = self.alloc(node_type);
        for &child in source.children(source_id) {
            let imported = self.import_subtree(source, child);
            self.append_child(copy, imported);
        }
        copy
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children only, skipping text, CDATA and comments.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.as_element(c).is_some())
    }

    /// Children whose tag name equals `tag`.
    pub fn children_by_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.tag_name(c) == Some(tag))
    }

    /// First child whose tag name equals `tag`.
    #[must_use]
    pub fn first_child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children_by_tag(id, tag).next()
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let preceding = self
            .index_in_parent(id)
            .map_or(&[][..], |(parent, index)| &self.children(parent)[..index]);
        preceding.iter().rev().copied()
    }

    /// Pre-order iterator over `id` and everything below it.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// Attribute `name` of an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|e| e.attrs.get(name))
    }

    /// Tag name for elements, or the reserved `#...` name for other nodes.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> &str {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(e)) => &e.tag_name,
            Some(NodeType::Text(_)) => TEXT_NODE_NAME,
            Some(NodeType::CData(_)) => CDATA_NODE_NAME,
            Some(NodeType::Comment(_)) => COMMENT_NODE_NAME,
            Some(NodeType::Document) | None => DOCUMENT_NODE_NAME,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
