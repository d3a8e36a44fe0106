//! Length math, column layout and the CSS inlining engine for the Quokka compiler.
//!
//! # Scope
//!
//! This crate implements:
//! - **Lengths** ([`values`]): pixel/percent/unitless parsing, 1 to 4 value
//!   shorthands, pixel formatting
//! - **Layout** ([`layout`]): the horizontal box model and sibling column
//!   width distribution
//! - **Stylesheets** ([`stylesheet`]): rules, declarations and the at-rules
//!   that pass through inlining untouched
//! - **Selectors** ([`selector`]): selector lists with compound terms,
//!   attribute predicates, the four combinators and specificity
//!   ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//! - **HTML scanning** ([`html`]): a tolerant element tree over rendered
//!   HTML that remembers where each opening tag and `style` value sits
//! - **Inlining** ([`inliner`]): merges matched declarations into `style`
//!   attributes in place
//!
//! # Not Implemented
//!
//! - Pseudo-class and pseudo-element matching (such rules are kept in a
//!   `<style>` block instead)
//! - Selector escapes and namespaces
//! - Layout beyond horizontal spacing

/// Tolerant element scanner for rendered HTML.
pub mod html;
/// Merges stylesheet rules into inline `style` attributes.
pub mod inliner;
/// Box model and column width distribution.
pub mod layout;
/// Selector parsing, matching and specificity per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Inline `style` attribute parsing, merging and serialization.
pub mod style_attribute;
/// Stylesheet parsing into rules and preserved at-rules.
pub mod stylesheet;
/// CSS length parsing and formatting.
pub mod values;

pub use html::{HtmlDocument, TagSpan, extract_styles};
pub use inliner::{inline, inline_additional_only};
pub use layout::{BoxModel, DistributionPolicy, column_pixel_widths, column_width_specs};
pub use selector::{ParsedSelector, SelectorList, Specificity, parse_selector, parse_selector_list};
pub use stylesheet::{Declaration, Rule, Stylesheet, parse_stylesheet};
