//! Metadata components inside `mj-head`.
//!
//! None of them render anything. Each one folds its attributes or content
//! into the [`DocumentContext`] before the body is rendered.

use quokka_common::Diagnostics;
use quokka_core::{CLASS_ATTRIBUTE, DocumentContext, UNIVERSAL_TAG};
use quokka_dom::{AttributesMap, DomTree, NodeId, NodeType};

use super::{BuiltinComponent, ComponentKind, ComponentRegistry};

const CLASS_TAG: &str = "mj-class";
const SELECTOR_TAG: &str = "mj-selector";
const HTML_ATTRIBUTE_TAG: &str = "mj-html-attribute";

/// Process every child of `mj-head` in document order.
pub(crate) fn process_head(
    tree: &DomTree,
    head: NodeId,
    document: &mut DocumentContext,
    registry: &ComponentRegistry,
    diagnostics: &mut Diagnostics,
) {
    for &child in tree.children(head) {
        match tree.get(child).map(|node| &node.node_type) {
            Some(NodeType::Comment(text)) => {
                let text = text.trim();
                if !text.is_empty() {
                    document.metadata.add_head_comment(text);
                }
            }
            Some(NodeType::Element(data)) => {
                let tag = data.tag_name.as_str();
                match registry.lookup(tag) {
                    Some(ComponentKind::Builtin(component)) if component.is_head() => {
                        process_component(tree, child, component, document, diagnostics);
                    }
                    Some(_) => {
                        diagnostics.warn("head", format!("{tag} is not allowed in mj-head, skipping"));
                    }
                    None => {
                        tracing::warn!(tag, "unknown MJML tag in mj-head, skipping");
                        diagnostics.warn("registry", format!("Unknown MJML tag: {tag}"));
                    }
                }
            }
            _ => {}
        }
    }
}

fn process_component(
    tree: &DomTree,
    node: NodeId,
    component: BuiltinComponent,
    document: &mut DocumentContext,
    diagnostics: &mut Diagnostics,
) {
    tracing::trace!(tag = component.tag(), "processing head component");
    match component {
        BuiltinComponent::Title => {
            let title = tree.inner_html(node);
            if !title.trim().is_empty() {
                document.metadata.set_title(title.trim());
            }
        }
        BuiltinComponent::Preview => {
            let preview = tree.inner_html(node);
            if !preview.trim().is_empty() {
                document.metadata.set_preview_text(preview.trim());
            }
        }
        BuiltinComponent::Breakpoint => {
            if let Some(width) = tree.attribute(node, "width") {
                document.metadata.set_breakpoint(width);
            }
        }
        BuiltinComponent::Font => process_font(tree, node, document, diagnostics),
        BuiltinComponent::Style => process_style(tree, node, document),
        BuiltinComponent::Attributes => process_attributes(tree, node, document),
        BuiltinComponent::HtmlAttributes => process_html_attributes(tree, node, document),
        BuiltinComponent::Raw => {
            let content = tree.inner_html(node);
            if tree.attribute(node, "position") == Some("file-start") {
                document.metadata.add_file_start_content(&content);
            } else {
                document.metadata.add_head_raw(&content);
            }
        }
        BuiltinComponent::Head => {
            diagnostics.warn("head", "Nested mj-head ignored");
        }
        _ => {}
    }
}

fn process_font(
    tree: &DomTree,
    node: NodeId,
    document: &mut DocumentContext,
    diagnostics: &mut Diagnostics,
) {
    let (Some(name), Some(href)) = (tree.attribute(node, "name"), tree.attribute(node, "href"))
    else {
        return;
    };
    if !(href.starts_with("http://") || href.starts_with("https://")) {
        diagnostics.warn(
            "mj-font",
            format!("mj-font href must start with http:// or https://, skipping: {name}"),
        );
        return;
    }
    document.styles.register_font_override(name, href);
}

fn process_style(tree: &DomTree, node: NodeId, document: &mut DocumentContext) {
    let css = strip_style_close(tree.inner_html(node).trim());
    if css.is_empty() {
        return;
    }
    if tree.attribute(node, "inline") == Some("inline") {
        document.styles.add_inline_style(&css);
    } else {
        document.styles.add_style(&css);
    }
}

/// Remove every `</style` sequence, case-insensitively.
fn strip_style_close(css: &str) -> String {
    const NEEDLE: &str = "</style";
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(pos) = rest.to_ascii_lowercase().find(NEEDLE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + NEEDLE.len()..];
    }
    out.push_str(rest);
    out
}

fn element_attributes(tree: &DomTree, node: NodeId, skip: &[&str]) -> AttributesMap {
    tree.as_element(node)
        .map(|data| {
            data.attrs
                .iter()
                .filter(|(name, _)| !skip.contains(name))
                .collect()
        })
        .unwrap_or_default()
}

fn process_attributes(tree: &DomTree, node: NodeId, document: &mut DocumentContext) {
    for child in tree.element_children(node) {
        let Some(tag) = tree.tag_name(child) else {
            continue;
        };
        match tag {
            UNIVERSAL_TAG => {
                let attrs = element_attributes(tree, child, &[CLASS_ATTRIBUTE]);
                document.attributes.set_defaults(UNIVERSAL_TAG, &attrs);
            }
            CLASS_TAG => {
                let Some(name) = tree.attribute(child, "name") else {
                    continue;
                };
                let attrs = element_attributes(tree, child, &["name", CLASS_ATTRIBUTE]);
                document.attributes.set_class(name, &attrs);
            }
            other => {
                let attrs = element_attributes(tree, child, &[CLASS_ATTRIBUTE]);
                document.attributes.set_defaults(other, &attrs);
            }
        }
    }
}

fn process_html_attributes(tree: &DomTree, node: NodeId, document: &mut DocumentContext) {
    for selector in tree.children_by_tag(node, SELECTOR_TAG) {
        let Some(path) = tree.attribute(selector, "path") else {
            continue;
        };
        let mut attrs = AttributesMap::default();
        for attribute in tree.children_by_tag(selector, HTML_ATTRIBUTE_TAG) {
            if let Some(name) = tree.attribute(attribute, "name") {
                let _ = attrs.insert(name, tree.inner_html(attribute).trim());
            }
        }
        if !attrs.is_empty() {
            document.attributes.set_html_attributes(path, &attrs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_close_is_stripped() {
        assert_eq!(strip_style_close(".a{}</STYLE><script>"), ".a{}><script>");
        assert_eq!(strip_style_close(".a{color:red}"), ".a{color:red}");
    }

    #[test]
    fn test_attributes_drop_class_reference() {
        let mut tree = DomTree::new();
        let attributes = tree.create_element("mj-attributes", AttributesMap::default());
        tree.append_child(NodeId::ROOT, attributes);
        let class = tree.create_element(
            "mj-class",
            [("name", "blue"), ("color", "blue"), ("mj-class", "x")]
                .into_iter()
                .collect(),
        );
        tree.append_child(attributes, class);
        let text = tree.create_element(
            "mj-text",
            [("font-size", "20px"), ("mj-class", "blue")].into_iter().collect(),
        );
        tree.append_child(attributes, text);

        let mut document = DocumentContext::new();
        process_attributes(&tree, attributes, &mut document);

        let class = document.attributes.class("blue").map(AttributesMap::len);
        assert_eq!(class, Some(1));
        let defaults = document.attributes.defaults("mj-text");
        assert_eq!(defaults.and_then(|d| d.get("font-size")), Some("20px"));
        assert_eq!(defaults.and_then(|d| d.get("mj-class")), None);
    }
}
