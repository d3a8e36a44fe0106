//! Markup serialization of subtrees.
//!
//! Text and CDATA leaves are written verbatim, so ending-tag content comes
//! back exactly as the author wrote it. Attribute values are escaped.

use quokka_common::escape::escape_attribute_value;

use crate::{DomTree, NodeId, NodeType};

impl DomTree {
    /// Concatenated markup of the children of `id`.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_outer(child, &mut out);
        }
        out
    }

    fn write_outer(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Text(text) | NodeType::CData(text) => out.push_str(text),
            NodeType::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeType::Document => {
                for &child in &node.children {
                    self.write_outer(child, out);
                }
            }
            NodeType::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_name);
                for (name, value) in element.attrs.iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute_value(value));
                    out.push('"');
                }
                if node.children.is_empty() {
                    out.push_str(" />");
                } else {
                    out.push('>');
                    for &child in &node.children {
                        self.write_outer(child, out);
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                }
            }
        }
    }
}
