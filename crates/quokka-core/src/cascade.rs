//! Five-level attribute resolution.
//!
//! A component reads an attribute by trying, in order:
//!
//! 1. the node's own attribute,
//! 2. each class named by its `mj-class` attribute, in listed order,
//! 3. the defaults registered for its tag,
//! 4. the defaults registered under `mj-all`,
//! 5. the component's built-in defaults.
//!
//! The first level holding the attribute wins. Short hex colours from
//! levels 1 to 4 are expanded to their six or eight digit form; built-in
//! defaults are returned as written. Lookups read the registries on every
//! call, so they see everything head processing registered.

use std::borrow::Cow;

use quokka_dom::{DomTree, NodeId};

use crate::context::{AttributeContext, CLASS_ATTRIBUTE};

/// Resolve `name` for `node`. `None` when no level has it.
#[must_use]
pub fn resolve(
    tree: &DomTree,
    node: NodeId,
    name: &str,
    registry: &AttributeContext,
    component_defaults: &[(&str, &str)],
) -> Option<String> {
    let user_value = tree
        .attribute(node, name)
        .or_else(|| {
            tree.attribute(node, CLASS_ATTRIBUTE).and_then(|classes| {
                classes
                    .split_whitespace()
                    .find_map(|class| registry.class(class).and_then(|attrs| attrs.get(name)))
            })
        })
        .or_else(|| {
            tree.tag_name(node)
                .and_then(|tag| registry.defaults(tag))
                .and_then(|attrs| attrs.get(name))
        })
        .or_else(|| registry.universal_defaults().and_then(|attrs| attrs.get(name)));

    if let Some(value) = user_value {
        return Some(expand_short_hex(value).into_owned());
    }
    component_defaults
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| (*value).to_string())
}

/// Expand `#rgb` to `#rrggbb` and `#rgba` to `#rrggbbaa`. Anything else is
/// returned unchanged.
///
/// # Example
/// ```
/// use quokka_core::expand_short_hex;
///
/// assert_eq!(expand_short_hex("#F0a"), "#FF00aa");
/// assert_eq!(expand_short_hex("#abcd"), "#aabbccdd");
/// assert_eq!(expand_short_hex("#abcde"), "#abcde");
/// ```
#[must_use]
pub fn expand_short_hex(value: &str) -> Cow<'_, str> {
    let Some(digits) = value.strip_prefix('#') else {
        return Cow::Borrowed(value);
    };
    if !matches!(digits.len(), 3 | 4) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Cow::Borrowed(value);
    }
    let mut expanded = String::with_capacity(1 + digits.len() * 2);
    expanded.push('#');
    for digit in digits.chars() {
        expanded.push(digit);
        expanded.push(digit);
    }
    Cow::Owned(expanded)
}

/// The cascade bound to one node, as components use it.
#[derive(Clone, Copy)]
pub struct Cascade<'a> {
    tree: &'a DomTree,
    node: NodeId,
    registry: &'a AttributeContext,
    defaults: &'a [(&'a str, &'a str)],
}

impl<'a> Cascade<'a> {
    /// Bind the cascade to `node` with its component's built-in defaults.
    #[must_use]
    pub const fn new(
        tree: &'a DomTree,
        node: NodeId,
        registry: &'a AttributeContext,
        defaults: &'a [(&'a str, &'a str)],
    ) -> Self {
        Self {
            tree,
            node,
            registry,
            defaults,
        }
    }

    /// The resolved value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        resolve(self.tree, self.node, name, self.registry, self.defaults)
    }

    /// The resolved value of `name`, or `fallback`.
    #[must_use]
    pub fn get_or(&self, name: &str, fallback: &str) -> String {
        self.get(name).unwrap_or_else(|| fallback.to_string())
    }

    /// The resolved value of `name` when present and non-empty.
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// The node this cascade reads.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// The tree the node lives in.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }
}
