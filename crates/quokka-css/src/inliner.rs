//! Moves stylesheet declarations into `style` attributes.
//!
//! Matching happens on an [`HtmlDocument`] scanned from the input, and the
//! result is produced by splicing new `style` values into the original
//! string at the recorded spans, so markup the scanner does not model
//! (comments, conditional blocks) passes through untouched.
//!
//! Declarations apply per element in ascending
//! [specificity](https://www.w3.org/TR/selectors-4/#specificity-rules) with
//! source order breaking ties, merged onto the element's existing inline
//! style; an `!important` declaration is only ever replaced by another
//! `!important` one. Rules with pseudo selectors and preserved at-rules
//! cannot be inlined and are written back into a `<style>` block by
//! [`inline`].

use std::collections::BTreeMap;

use quokka_dom::NodeId;

use crate::html::{HtmlDocument, extract_styles};
use crate::selector::{SelectorList, Specificity, parse_selector_list};
use crate::style_attribute;
use crate::stylesheet::{Declaration, Rule, parse_stylesheet};

/// A rule whose selector list parsed and has no pseudo selectors.
struct InlineRule<'a> {
    selectors: SelectorList,
    declarations: &'a [Declaration],
}

/// Split rules into inlineable ones and those that must stay in a
/// `<style>` block. Rules with unparseable selectors are dropped.
fn partition_rules(rules: &[Rule]) -> (Vec<InlineRule<'_>>, Vec<&Rule>) {
    let mut inlineable = Vec::new();
    let mut kept = Vec::new();
    for rule in rules {
        match parse_selector_list(&rule.selector_text) {
            Some(selectors) if selectors.has_pseudo() => kept.push(rule),
            Some(selectors) => inlineable.push(InlineRule {
                selectors,
                declarations: &rule.declarations,
            }),
            None => tracing::debug!(selector = %rule.selector_text, "dropping unsupported selector"),
        }
    }
    (inlineable, kept)
}

/// Inline every `<style>` element of `html` plus `additional_css`.
///
/// The `<style>` elements are removed. Pseudo rules and preserved at-rules
/// come back in one `<style type="text/css">` block placed before
/// `</head>`, after the opening `<body>` tag, or at the very start, in that
/// order of preference. Without any CSS the input is returned unchanged.
#[must_use]
pub fn inline(html: &str, additional_css: Option<&str>) -> String {
    if html.is_empty() {
        return String::new();
    }

    let extracted = extract_styles(html);
    let mut css = String::new();
    if !extracted.css.trim().is_empty() {
        css.push_str(&extracted.css);
        css.push('\n');
    }
    if let Some(additional) = additional_css.filter(|c| !c.trim().is_empty()) {
        css.push_str(additional);
    }
    if css.is_empty() {
        return html.to_string();
    }

    let sheet = parse_stylesheet(&css);
    let mut doc = HtmlDocument::parse(&extracted.html);
    let (rules, kept) = partition_rules(&sheet.rules);
    tracing::debug!(
        inlineable = rules.len(),
        kept = kept.len(),
        "inlining stylesheet"
    );

    let modified = apply_rules(&mut doc, &rules);
    let mut result = rebuild(&extracted.html, &doc, &modified);

    let mut preserved = String::new();
    for rule in kept {
        preserved.push_str(&rule.to_string());
        preserved.push('\n');
    }
    for at_rule in &sheet.preserved_at_rules {
        preserved.push_str(at_rule);
        preserved.push('\n');
    }
    if !preserved.is_empty() {
        result = insert_style_block(&result, &preserved);
    }
    result
}

/// Inline `css` into `html` without touching the document's own `<style>`
/// elements. Only elements that receive declarations change; pseudo rules
/// and at-rules in `css` are discarded.
#[must_use]
pub fn inline_additional_only(html: &str, css: &str) -> String {
    if html.is_empty() || css.trim().is_empty() {
        return html.to_string();
    }

    let sheet = parse_stylesheet(css);
    let (rules, _) = partition_rules(&sheet.rules);
    if rules.is_empty() {
        return html.to_string();
    }

    let mut doc = HtmlDocument::parse(html);
    let modified = apply_rules(&mut doc, &rules);
    if modified.is_empty() {
        return html.to_string();
    }
    rebuild(html, &doc, &modified)
}

/// Merge matching declarations into each element's `style` attribute,
/// returning the elements that matched at least one rule.
fn apply_rules(doc: &mut HtmlDocument, rules: &[InlineRule<'_>]) -> Vec<NodeId> {
    let elements: Vec<NodeId> = doc.elements().collect();
    let mut modified = Vec::new();

    for element in elements {
        let mut applicable: Vec<(Specificity, usize, &[Declaration])> = rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                rule.selectors
                    .matching_specificity(doc.tree(), element)
                    .map(|specificity| (specificity, index, rule.declarations))
            })
            .collect();
        if applicable.is_empty() {
            continue;
        }
        applicable.sort_by_key(|&(specificity, index, _)| (specificity, index));

        let mut style = style_attribute::parse(doc.tree().attribute(element, "style").unwrap_or(""));
        for (_, _, declarations) in applicable {
            style_attribute::merge(&mut style, declarations);
        }
        if let Some(data) = doc.tree_mut().as_element_mut(element) {
            let _ = data.attrs.insert("style", style_attribute::serialize(&style));
        }
        modified.push(element);
    }
    modified
}

/// Splice the `style` attribute of each element in `elements` into `html`.
fn rebuild(html: &str, doc: &HtmlDocument, elements: &[NodeId]) -> String {
    let mut changes: BTreeMap<usize, (usize, String)> = BTreeMap::new();

    for &element in elements {
        let Some(style) = doc.tree().attribute(element, "style").filter(|s| !s.is_empty()) else {
            continue;
        };
        let Some(span) = doc.span(element) else {
            continue;
        };
        let style = style.replace('"', "&quot;");
        match &span.style {
            Some(range) => {
                let _ = changes.insert(range.start, (range.end, style));
            }
            None => {
                let at = span.attribute_insertion_point(html);
                let _ = changes.insert(at, (at, format!(" style=\"{style}\"")));
            }
        }
    }

    let mut out = html.to_string();
    for (start, (end, replacement)) in changes.into_iter().rev() {
        out.replace_range(start..end, &replacement);
    }
    out
}

fn insert_style_block(html: &str, css: &str) -> String {
    let block = format!("<style type=\"text/css\">\n{css}</style>\n");
    let lower = html.to_ascii_lowercase();

    if let Some(head_close) = lower.find("</head>") {
        return format!("{}{block}{}", &html[..head_close], &html[head_close..]);
    }
    let body_open_end = lower
        .find("<body")
        .and_then(|start| html[start..].find('>').map(|end| start + end + 1));
    if let Some(at) = body_open_end {
        return format!("{}\n{block}{}", &html[..at], &html[at..]);
    }
    block + html
}
