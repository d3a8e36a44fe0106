//! `mj-html-attributes`: literal attributes spliced into rendered HTML.
//!
//! Each directive's selector runs against a scan of the rendered body with
//! the same matcher the inliner uses. Matching opening tags receive the
//! attributes just before their `>`; the rest of the markup is untouched.

use std::collections::BTreeMap;

use quokka_common::escape::escape_attribute_value;
use quokka_core::AttributeContext;
use quokka_css::{HtmlDocument, parse_selector_list};

fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Apply every registered directive to `html`.
pub(crate) fn apply(html: &str, attributes: &AttributeContext) -> String {
    let directives = attributes.html_attributes();
    if directives.is_empty() {
        return html.to_string();
    }

    let document = HtmlDocument::parse(html);
    let elements: Vec<_> = document.elements().collect();
    let mut insertions: BTreeMap<usize, String> = BTreeMap::new();

    for (selector, attrs) in directives {
        let Some(selectors) = parse_selector_list(selector) else {
            tracing::debug!(selector = selector.as_str(), "skipping invalid html-attributes selector");
            continue;
        };
        let rendered: String = attrs
            .iter()
            .filter(|(name, _)| is_valid_attribute_name(name))
            .map(|(name, value)| format!(" {name}=\"{}\"", escape_attribute_value(value)))
            .collect();
        if rendered.is_empty() {
            continue;
        }
        for &element in &elements {
            if !selectors.matches_in_tree(document.tree(), element) {
                continue;
            }
            if let Some(span) = document.span(element) {
                insertions
                    .entry(span.attribute_insertion_point(html))
                    .or_default()
                    .push_str(&rendered);
            }
        }
    }

    let mut output = html.to_string();
    for (position, text) in insertions.iter().rev() {
        output.insert_str(*position, text);
    }
    output
}
