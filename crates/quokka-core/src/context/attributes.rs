//! Attribute registries filled by `mj-attributes` and `mj-html-attributes`.

use std::collections::HashMap;

use quokka_dom::AttributesMap;

/// Registry key whose defaults apply to every tag.
pub const UNIVERSAL_TAG: &str = "mj-all";

/// Attribute holding a node's space-separated class list.
pub const CLASS_ATTRIBUTE: &str = "mj-class";

/// Per-tag defaults, named classes and HTML-attribute directives.
///
/// Registering the same tag, class or selector again merges into the
/// existing entry, later values replacing earlier ones.
#[derive(Debug, Clone, Default)]
pub struct AttributeContext {
    defaults: HashMap<String, AttributesMap>,
    classes: HashMap<String, AttributesMap>,
    html_attributes: Vec<(String, AttributesMap)>,
}

impl AttributeContext {
    /// Merge defaults for `tag` (or [`UNIVERSAL_TAG`]).
    pub fn set_defaults(&mut self, tag: &str, attrs: &AttributesMap) {
        self.defaults
            .entry(tag.to_string())
            .or_default()
            .extend_from(attrs);
    }

    /// Defaults registered for `tag`.
    #[must_use]
    pub fn defaults(&self, tag: &str) -> Option<&AttributesMap> {
        self.defaults.get(tag)
    }

    /// Defaults registered under [`UNIVERSAL_TAG`].
    #[must_use]
    pub fn universal_defaults(&self) -> Option<&AttributesMap> {
        self.defaults(UNIVERSAL_TAG)
    }

    /// Merge attributes for the class `name`.
    pub fn set_class(&mut self, name: &str, attrs: &AttributesMap) {
        self.classes
            .entry(name.to_string())
            .or_default()
            .extend_from(attrs);
    }

    /// Attributes of the class `name`.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&AttributesMap> {
        self.classes.get(name)
    }

    /// Merge literal attributes for elements matching `selector`.
    pub fn set_html_attributes(&mut self, selector: &str, attrs: &AttributesMap) {
        match self.html_attributes.iter_mut().find(|(s, _)| s == selector) {
            Some((_, existing)) => existing.extend_from(attrs),
            None => self
                .html_attributes
                .push((selector.to_string(), attrs.clone())),
        }
    }

    /// HTML-attribute directives in registration order.
    #[must_use]
    pub fn html_attributes(&self) -> &[(String, AttributesMap)] {
        &self.html_attributes
    }
}
