//! Depth-first body rendering.
//!
//! [`BodyRenderer`] walks the body subtree, dispatching each element to its
//! component through the [`ComponentRegistry`]. It reads the document
//! context gathered from the head but never writes to it: media queries,
//! the fluid-image flag and file-start markup raised while rendering are
//! collected in [`RenderEffects`] and merged by the pipeline afterwards.

use std::borrow::Cow;

use quokka_common::escape::escape_attribute_value;
use quokka_common::{Diagnostics, Result};
use quokka_core::{Cascade, DocumentContext, MediaQuery, RenderContext};
use quokka_css::BoxModel;
use quokka_css::values::parse_px;
use quokka_dom::{DomTree, NodeId, NodeType};

use super::style::media_query_width;
use super::{BuiltinComponent, ComponentKind, ComponentRegistry};
use crate::config::Configuration;

pub(crate) const BODY_DEFAULTS: &[(&str, &str)] = &[("width", "600px")];

/// Side effects of rendering the body.
#[derive(Debug, Default)]
pub(crate) struct RenderEffects {
    pub(crate) media_queries: Vec<MediaQuery>,
    pub(crate) fluid_on_mobile: bool,
    pub(crate) file_start: Vec<String>,
}

impl RenderEffects {
    /// Fold the effects into `document`.
    pub(crate) fn merge_into(self, document: &mut DocumentContext) {
        for query in &self.media_queries {
            document.styles.add_media_query(
                &query.class_name,
                &query.width_value,
                &query.width_unit,
            );
        }
        if self.fluid_on_mobile {
            document.styles.set_fluid_on_mobile_used(true);
        }
        for content in &self.file_start {
            document.metadata.add_file_start_content(content);
        }
    }
}

pub(crate) struct BodyRenderer<'a> {
    tree: &'a DomTree,
    document: &'a DocumentContext,
    registry: &'a ComponentRegistry,
    config: &'a Configuration,
    diagnostics: &'a mut Diagnostics,
    effects: RenderEffects,
}

impl<'a> BodyRenderer<'a> {
    pub(crate) fn new(
        tree: &'a DomTree,
        document: &'a DocumentContext,
        registry: &'a ComponentRegistry,
        config: &'a Configuration,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            tree,
            document,
            registry,
            config,
            diagnostics,
            effects: RenderEffects::default(),
        }
    }

    /// Render `mj-body` and everything below it.
    ///
    /// The container width and body background must already be recorded in
    /// the document metadata.
    pub(crate) fn render_body(mut self, body: NodeId) -> Result<(String, RenderEffects)> {
        let attrs = self.attrs(body, BuiltinComponent::Body);
        let metadata = &self.document.metadata;
        let width = metadata.container_width();

        let mut html = String::from("  <div");
        if !metadata.title().is_empty() {
            html.push_str(&format!(" aria-label=\"{}\"", self.escape(metadata.title())));
        }
        html.push_str(" aria-roledescription=\"email\"");
        let background = metadata.body_background_color();
        let style = if background.is_empty() {
            String::new()
        } else {
            format!("background-color:{};", self.escape(background))
        };
        html.push_str(&format!(
            " style=\"{style}\" role=\"article\" lang=\"{}\" dir=\"{}\"",
            self.escape(self.config.language()),
            self.config.direction()
        ));
        if let Some(class) = attrs.non_empty("css-class") {
            html.push_str(&format!(" class=\"{}\"", self.escape(&class)));
        }
        html.push_str(">\n");

        let root = RenderContext::new(f64::from(width));
        let tree = self.tree;
        let count = tree.element_children(body).count();
        let mut index = 0;
        for &child in tree.children(body) {
            match tree.get(child).map(|node| &node.node_type) {
                Some(NodeType::Element(_)) => {
                    let context = root.with_position(index, count);
                    index += 1;
                    html.push_str(&self.render_node(child, &context)?);
                }
                Some(NodeType::Comment(text)) => {
                    html.push_str(&format!("    <!-- {} -->\n", text.trim()));
                }
                _ => {}
            }
        }
        html.push_str("  </div>\n");
        Ok((html, self.effects))
    }

    /// Render one element through the registry. Unknown tags produce a
    /// diagnostic and no output.
    pub(super) fn render_node(&mut self, node: NodeId, context: &RenderContext) -> Result<String> {
        let tree = self.tree;
        let registry = self.registry;
        let Some(tag) = tree.tag_name(node) else {
            return Ok(String::new());
        };
        match registry.lookup(tag) {
            None => {
                tracing::warn!(tag, "unknown MJML tag in mj-body, skipping");
                self.diagnostics.warn("registry", format!("Unknown MJML tag: {tag}"));
                Ok(String::new())
            }
            Some(ComponentKind::Custom(factory)) => {
                let component = factory(node, self.document, context);
                let attrs = Cascade::new(
                    tree,
                    node,
                    &self.document.attributes,
                    component.default_attributes(),
                );
                component.render(attrs, context)
            }
            Some(ComponentKind::Builtin(builtin)) => self.render_builtin(builtin, node, context),
        }
    }

    fn render_builtin(
        &mut self,
        component: BuiltinComponent,
        node: NodeId,
        context: &RenderContext,
    ) -> Result<String> {
        match component {
            BuiltinComponent::Section => self.render_section(node, context),
            BuiltinComponent::Wrapper => self.render_wrapper(node, context),
            BuiltinComponent::Column => self.render_column(node, context),
            BuiltinComponent::Group => self.render_group(node, context),
            BuiltinComponent::Text => Ok(self.render_text(node)),
            BuiltinComponent::Image => Ok(self.render_image(node, context)),
            BuiltinComponent::Button => Ok(self.render_button(node, context)),
            BuiltinComponent::Divider => Ok(self.render_divider(node, context)),
            BuiltinComponent::Spacer => Ok(self.render_spacer(node)),
            BuiltinComponent::Table => Ok(self.render_table(node)),
            BuiltinComponent::Raw => Ok(self.render_raw(node)),
            BuiltinComponent::Body
            | BuiltinComponent::Head
            | BuiltinComponent::Title
            | BuiltinComponent::Preview
            | BuiltinComponent::Breakpoint
            | BuiltinComponent::Font
            | BuiltinComponent::Style
            | BuiltinComponent::Attributes
            | BuiltinComponent::HtmlAttributes => {
                tracing::debug!(tag = component.tag(), "skipping misplaced component in body");
                Ok(String::new())
            }
        }
    }

    pub(super) const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    pub(super) const fn document(&self) -> &'a DocumentContext {
        self.document
    }

    /// The cascade for `node` with `component`'s built-in defaults.
    pub(super) fn attrs(&self, node: NodeId, component: BuiltinComponent) -> Cascade<'a> {
        Cascade::new(
            self.tree,
            node,
            &self.document.attributes,
            component.default_attributes(),
        )
    }

    pub(super) const fn registry(&self) -> &'a ComponentRegistry {
        self.registry
    }

    /// The cascade for a custom component's node, without built-in
    /// defaults.
    pub(super) fn custom_attrs(&self, node: NodeId) -> Cascade<'a> {
        Cascade::new(self.tree, node, &self.document.attributes, &[])
    }

    /// Escape an attribute value when sanitizing.
    pub(super) fn escape<'v>(&self, value: &'v str) -> Cow<'v, str> {
        if self.config.sanitize_output() {
            escape_attribute_value(value)
        } else {
            Cow::Borrowed(value)
        }
    }

    /// An escaped `href`, with script and document `data:` URLs replaced by
    /// `#` when sanitizing.
    pub(super) fn href(&self, value: &str) -> String {
        if self.config.sanitize_output() && is_dangerous_href(value) {
            return "#".to_string();
        }
        self.escape(value).into_owned()
    }

    pub(super) fn register_media_query(&mut self, class_name: &str, spec: Option<&str>) {
        let (width_value, unit) = media_query_width(spec);
        let query = MediaQuery {
            class_name: class_name.to_string(),
            width_value,
            width_unit: unit.to_string(),
        };
        if !self.effects.media_queries.contains(&query) {
            self.effects.media_queries.push(query);
        }
    }

    pub(super) const fn mark_fluid_on_mobile(&mut self) {
        self.effects.fluid_on_mobile = true;
    }

    pub(super) fn add_file_start(&mut self, content: String) {
        self.effects.file_start.push(content);
    }
}

/// Padding and side borders of `attrs`, with `padding-*` overrides
/// applied when `overrides` is set.
pub(super) fn box_model(attrs: &Cascade<'_>, overrides: bool) -> BoxModel {
    let padding = attrs.get_or("padding", "0");
    let border = attrs.get_or("border", "none");
    let mut model = BoxModel::from_attributes(
        Some(&padding),
        Some(&border),
        attrs.get("border-left").as_deref(),
        attrs.get("border-right").as_deref(),
    );
    if overrides {
        for (name, edge) in [
            ("padding-top", &mut model.padding.top),
            ("padding-right", &mut model.padding.right),
            ("padding-bottom", &mut model.padding.bottom),
            ("padding-left", &mut model.padding.left),
        ] {
            if let Some(value) = attrs.non_empty(name) {
                *edge = parse_px(&value, 0.0);
            }
        }
    }
    model
}

fn is_dangerous_href(href: &str) -> bool {
    let href = href.trim().to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:text/html", "data:image/svg+xml"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangerous_hrefs() {
        assert!(is_dangerous_href(" JavaScript:alert(1)"));
        assert!(is_dangerous_href("data:text/html;base64,xx"));
        assert!(!is_dangerous_href("https://example.com"));
        assert!(!is_dangerous_href("data:image/png;base64,xx"));
    }

    #[test]
    fn test_effects_merge_deduplicates_media_queries() {
        let query = MediaQuery {
            class_name: "mj-column-per-50".to_string(),
            width_value: "50".to_string(),
            width_unit: "%".to_string(),
        };
        let effects = RenderEffects {
            media_queries: vec![query.clone(), query],
            fluid_on_mobile: true,
            file_start: vec!["{% raw %}".to_string()],
        };
        let mut document = DocumentContext::new();
        effects.merge_into(&mut document);
        assert_eq!(document.styles.media_queries().len(), 1);
        assert!(document.styles.fluid_on_mobile_used());
        assert_eq!(document.metadata.file_start_content(), ["{% raw %}"]);
    }
}
