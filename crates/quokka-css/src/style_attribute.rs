//! The `style` attribute as an ordered declaration list.
//!
//! [CSS Style Attributes](https://www.w3.org/TR/css-style-attr/)

use crate::stylesheet::{Declaration, parse_declarations};

/// Parse an inline `style` value.
#[must_use]
pub fn parse(style: &str) -> Vec<Declaration> {
    parse_declarations(style)
}

/// Serialize as `prop: value; prop: value !important;`.
#[must_use]
pub fn serialize(declarations: &[Declaration]) -> String {
    let mut out = String::new();
    for declaration in declarations {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&declaration.property);
        out.push_str(": ");
        out.push_str(&declaration.value);
        if declaration.important {
            out.push_str(" !important");
        }
        out.push(';');
    }
    out
}

/// Merge `incoming` onto `existing`, keyed by property.
///
/// A new property is appended. For an existing property the incoming
/// declaration replaces it in place, unless the existing one is
/// `!important` and the incoming one is not.
pub fn merge(existing: &mut Vec<Declaration>, incoming: &[Declaration]) {
    for declaration in incoming {
        match existing
            .iter_mut()
            .find(|d| d.property == declaration.property)
        {
            None => existing.push(declaration.clone()),
            Some(current) if current.important && !declaration.important => {}
            Some(current) => *current = declaration.clone(),
        }
    }
}
