//! The compile pipeline.
//!
//! One [`Compiler::compile`] call runs every phase in order:
//!
//! 1. reject oversized input
//! 2. preprocess and parse
//! 3. expand `mj-include` (only with a resolver)
//! 4. process `mj-head` into the document context
//! 5. register default fonts the body uses
//! 6. render `mj-body`
//! 7. merge adjacent Outlook conditionals
//! 8. apply `mj-html-attributes`
//! 9. wrap the body in the HTML skeleton
//! 10. inline `mj-style inline="inline"` rules
//!
//! Each call owns its tree, context and diagnostics; the compiler itself is
//! read-only and can be shared between threads.

use quokka_common::{Diagnostic, Diagnostics, Error, Result};
use quokka_core::{Cascade, DEFAULT_CONTAINER_WIDTH, DocumentContext};
use quokka_css::inline_additional_only;
use quokka_css::values::parse_pixels;
use quokka_markup::include::INCLUDE_TAG;
use quokka_markup::{IncludeExpander, IncludeLimits, MjmlDocument, parse_with_depth};
use serde::Serialize;

use crate::components::{BodyRenderer, BuiltinComponent, ComponentRegistry, head};
use crate::config::Configuration;
use crate::{fonts, html_attributes, skeleton};

const CLOSE_CONDITIONAL: &str = "<![endif]-->";
const OPEN_CONDITIONAL: &str = "<!--[if mso | IE]>";

/// Outlook conditionals that end one section and may be followed directly by
/// the next section's opening table.
const SECTION_CLOSERS: [&str; 2] = [
    "<!--[if mso | IE]></td></tr></table>",
    "<!--[if mso | IE]></v:textbox></v:rect></td></tr></table>",
];

/// Result of one compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileOutput {
    /// The complete HTML document.
    pub html: String,
    /// Resolved `mj-title`, empty when absent.
    pub title: String,
    /// Resolved `mj-preview`, empty when absent.
    pub preview_text: String,
    /// Warnings raised while compiling, in order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles templates to HTML.
#[derive(Debug)]
pub struct Compiler {
    config: Configuration,
    registry: ComponentRegistry,
}

impl Compiler {
    /// Build a compiler. Custom components from `config` are registered
    /// and the registry frozen.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a custom component cannot be
    /// registered.
    pub fn new(config: Configuration) -> Result<Self> {
        let mut registry = ComponentRegistry::new();
        for (tag, factory) in config.custom_components() {
            registry.register(tag.clone(), factory.clone())?;
        }
        registry.freeze();
        Ok(Self { config, registry })
    }

    /// The configuration this compiler was built with.
    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// The frozen component registry.
    #[must_use]
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Compile `source` to a complete HTML document.
    ///
    /// # Errors
    ///
    /// - validation error when the input or its nesting is too large
    /// - parse error for malformed markup or a missing `<mjml>` root
    /// - include error when an include cannot be resolved, is circular or
    ///   nests too deep
    /// - render error when a custom component fails
    pub fn compile(&self, source: &str) -> Result<CompileOutput> {
        let size = source.chars().count();
        let max = self.config.max_input_size();
        if size > max {
            return Err(Error::Validation(format!(
                "Input size {size} characters exceeds maximum allowed {max}"
            )));
        }

        let mut document = parse_with_depth(source, self.config.max_nesting_depth())?;
        tracing::debug!(nodes = document.tree().len(), "parsed template");
        let mut diagnostics = Diagnostics::new();

        if let Some(resolver) = self.config.resolver() {
            let limits = IncludeLimits {
                max_include_depth: self.config.max_include_depth(),
                max_input_size: max,
                max_nesting_depth: self.config.max_nesting_depth(),
            };
            IncludeExpander::new(resolver, limits)?.expand(&mut document)?;
        }
        report_unresolved_includes(&document, &mut diagnostics);

        let mut context = DocumentContext::new();
        let tree = document.tree();
        if let Some(head) = document.head() {
            head::process_head(tree, head, &mut context, &self.registry, &mut diagnostics);
        }

        let body_html = match document.body() {
            Some(body) => {
                fonts::register_used_fonts(tree, body, &mut context);

                let attrs = Cascade::new(
                    tree,
                    body,
                    &context.attributes,
                    BuiltinComponent::Body.default_attributes(),
                );
                let width = parse_pixels(
                    &attrs.get_or("width", "600px"),
                    i64::from(DEFAULT_CONTAINER_WIDTH),
                );
                let width = u32::try_from(width).unwrap_or(DEFAULT_CONTAINER_WIDTH);
                let background = attrs.get_or("background-color", "");
                context.metadata.set_container_width(width);
                context.metadata.set_body_background_color(background);

                let renderer =
                    BodyRenderer::new(tree, &context, &self.registry, &self.config, &mut diagnostics);
                let (html, effects) = renderer.render_body(body)?;
                effects.merge_into(&mut context);
                html
            }
            None => {
                diagnostics.warn("pipeline", "Document has no mj-body");
                String::new()
            }
        };

        let body_html = merge_section_transitions(&body_html);
        let body_html = html_attributes::apply(&body_html, &context.attributes);
        let mut html = skeleton::assemble(&body_html, &context, &self.config);

        let inline_styles = context.styles.inline_styles();
        if !inline_styles.is_empty() {
            let mut css = inline_styles.join("\n");
            css.push('\n');
            html = inline_additional_only(&html, &css)
                .replace(" style=\"\"", " style")
                .replace(" />", ">");
        }

        Ok(CompileOutput {
            html,
            title: context.metadata.title().to_string(),
            preview_text: context.metadata.preview_text().to_string(),
            diagnostics: diagnostics.into_entries(),
        })
    }
}

/// Fold the Outlook table that closes one section into the one opening
/// the next.
/// Fold `<![endif]-->`, whitespace and `<!--[if mso | IE]>` between two
/// sections so they share one conditional block.
fn merge_section_transitions(html: &str) -> String {
    let mut merged = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find(CLOSE_CONDITIONAL) {
        let (before, after) = rest.split_at(pos);
        let after_close = &after[CLOSE_CONDITIONAL.len()..];
        merged.push_str(before);
        let next_table = after_close
            .trim_ascii_start()
            .strip_prefix(OPEN_CONDITIONAL)
            .filter(|reopened| reopened.starts_with("<table "));
        match next_table {
            Some(reopened) if SECTION_CLOSERS.iter().any(|closer| before.ends_with(closer)) => {
                rest = reopened;
            }
            _ => {
                merged.push_str(CLOSE_CONDITIONAL);
                rest = after_close;
            }
        }
    }
    merged.push_str(rest);
    merged
}

fn report_unresolved_includes(document: &MjmlDocument, diagnostics: &mut Diagnostics) {
    let tree = document.tree();
    for node in tree.descendants(document.root()) {
        if tree.tag_name(node) == Some(INCLUDE_TAG) {
            let path = tree.attribute(node, "path").unwrap_or_default();
            diagnostics.warn(
                "include",
                format!("Unresolved mj-include remains in tree: {path}"),
            );
        }
    }
}
