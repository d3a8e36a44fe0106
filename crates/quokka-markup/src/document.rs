//! A parsed template.

use quokka_dom::{DomTree, NodeId};

/// Tag of the head section.
pub const HEAD_TAG: &str = "mj-head";
/// Tag of the body section.
pub const BODY_TAG: &str = "mj-body";

/// A parsed template: the node tree plus the id of its `<mjml>` root.
#[derive(Debug, Clone)]
pub struct MjmlDocument {
    tree: DomTree,
    root: NodeId,
}

impl MjmlDocument {
    /// Wrap a tree whose `<mjml>` element is `root`.
    #[must_use]
    pub const fn new(tree: DomTree, root: NodeId) -> Self {
        Self { tree, root }
    }

    /// The `<mjml>` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The node tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Mutable access for tree rewrites such as include expansion.
    pub const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// First `<mj-head>` child of the root.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.tree.first_child_by_tag(self.root, HEAD_TAG)
    }

    /// First `<mj-body>` child of the root.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.tree.first_child_by_tag(self.root, BODY_TAG)
    }
}
