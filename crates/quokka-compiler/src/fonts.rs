//! Web fonts linked automatically when the body uses them.

use quokka_core::{Cascade, DocumentContext};
use quokka_dom::{DomTree, NodeId};

use crate::components::BuiltinComponent;

/// Fonts linked without an `mj-font` declaration.
pub const DEFAULT_FONTS: &[(&str, &str)] = &[
    (
        "Open Sans",
        "https://fonts.googleapis.com/css?family=Open+Sans:300,400,500,700",
    ),
    (
        "Droid Sans",
        "https://fonts.googleapis.com/css?family=Droid+Sans:300,400,500,700",
    ),
    ("Lato", "https://fonts.googleapis.com/css?family=Lato:300,400,500,700"),
    ("Roboto", "https://fonts.googleapis.com/css?family=Roboto:300,400,500,700"),
    ("Ubuntu", "https://fonts.googleapis.com/css?family=Ubuntu:300,400,500,700"),
];

/// Register every known font named in a resolved `font-family` below
/// `body`. Fonts already registered are left alone.
pub(crate) fn register_used_fonts(tree: &DomTree, body: NodeId, document: &mut DocumentContext) {
    let families: Vec<String> = tree
        .descendants(body)
        .filter_map(|node| {
            let component = tree.tag_name(node).and_then(BuiltinComponent::from_tag)?;
            Cascade::new(tree, node, &document.attributes, component.default_attributes())
                .non_empty("font-family")
        })
        .collect();
    for family in &families {
        register_family(family, document);
    }
}

fn register_family(family: &str, document: &mut DocumentContext) {
    for &(name, default_href) in DEFAULT_FONTS {
        if family.contains(name) && !document.styles.has_font(name) {
            let href = document
                .styles
                .font_url_override(name)
                .unwrap_or(default_href)
                .to_string();
            tracing::debug!(font = name, "registering default font");
            document.styles.add_font(name, &href);
        }
    }

    let mut declared: Vec<(String, String)> = document
        .styles
        .font_url_overrides()
        .iter()
        .filter(|(name, _)| !DEFAULT_FONTS.iter().any(|(known, _)| *known == name.as_str()))
        .map(|(name, href)| (name.clone(), href.clone()))
        .collect();
    declared.sort();
    for (name, href) in declared {
        if family.contains(name.as_str()) && !document.styles.has_font(&name) {
            document.styles.add_font(&name, &href);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_uses_override() {
        let mut document = DocumentContext::new();
        document
            .styles
            .register_font_override("Roboto", "https://cdn.example.com/roboto.css");
        register_family("Roboto, Arial", &mut document);
        let fonts = document.styles.fonts();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].href, "https://cdn.example.com/roboto.css");
    }

    #[test]
    fn test_declared_font_registers_only_when_referenced() {
        let mut document = DocumentContext::new();
        document
            .styles
            .register_font_override("Raleway", "https://fonts.example.com/raleway.css");
        register_family("Arial", &mut document);
        assert!(document.styles.fonts().is_empty());
        register_family("Raleway, sans-serif", &mut document);
        assert!(document.styles.has_font("Raleway"));
    }
}
