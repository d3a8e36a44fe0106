//! Depth-first include expansion.

use std::str::FromStr;

use quokka_common::{Error, ErrorKind, Result};
use quokka_dom::{AttributesMap, DomTree, NodeId, NodeType};

use super::{ContentResolver, DEFAULT_MAX_INCLUDE_DEPTH, INCLUDE_TAG, IncludeKind, ResolverContext};
use crate::document::{HEAD_TAG, MjmlDocument};
use crate::parser::{DEFAULT_MAX_NESTING_DEPTH, ROOT_TAG, parse_with_depth};

/// Safety ceilings applied while expanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeLimits {
    /// Include nesting ceiling; a reference at this depth fails.
    pub max_include_depth: usize,
    /// Largest accepted resolved content, in characters.
    pub max_input_size: usize,
    /// Nesting ceiling passed to the parser for included markup.
    pub max_nesting_depth: usize,
}

impl Default for IncludeLimits {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            max_input_size: usize::MAX,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Rewrites `mj-include` references in place with resolved content.
pub struct IncludeExpander<'r> {
    resolver: &'r dyn ContentResolver,
    limits: IncludeLimits,
}

impl<'r> IncludeExpander<'r> {
    /// Expander over `resolver`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when any limit is zero.
    pub fn new(resolver: &'r dyn ContentResolver, limits: IncludeLimits) -> Result<Self> {
        if limits.max_include_depth == 0 {
            return Err(Error::Configuration(
                "max_include_depth must be positive, got: 0".to_string(),
            ));
        }
        if limits.max_input_size == 0 || limits.max_nesting_depth == 0 {
            return Err(Error::Configuration(
                "include size and nesting limits must be positive".to_string(),
            ));
        }
        Ok(Self { resolver, limits })
    }

    /// Expand every include reachable from the document root.
    ///
    /// # Errors
    ///
    /// Returns an include error for a missing path, an unknown type, a
    /// resolver failure, a cycle or the depth ceiling; a validation error for
    /// oversized content; and a parse error for included full documents
    /// that do not parse. Fragments that do not parse become raw blocks.
    pub fn expand(&self, document: &mut MjmlDocument) -> Result<()> {
        let root = document.root();
        let mut chain = Vec::new();
        self.expand_children(document.tree_mut(), root, &mut chain, 0)
    }

    fn expand_children(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        chain: &mut Vec<String>,
        depth: usize,
    ) -> Result<()> {
        // The child list is rewritten as we go, so walk a snapshot.
        let children = tree.children(node).to_vec();
        for child in children {
            let Some(tag) = tree.tag_name(child) else {
                continue;
            };
            if tag == INCLUDE_TAG {
                self.resolve_include(tree, child, chain, depth)?;
            } else {
                self.expand_children(tree, child, chain, depth)?;
            }
        }
        Ok(())
    }

    fn resolve_include(
        &self,
        tree: &mut DomTree,
        include: NodeId,
        chain: &mut Vec<String>,
        depth: usize,
    ) -> Result<()> {
        let max_depth = self.limits.max_include_depth;
        if depth >= max_depth {
            return Err(Error::include(format!(
                "Maximum include depth exceeded ({max_depth}). Possible circular include."
            )));
        }

        let path = match tree.attribute(include, "path") {
            Some(path) if !path.trim().is_empty() => path.to_string(),
            _ => return Err(Error::include("mj-include requires a 'path' attribute")),
        };
        if chain.contains(&path) {
            return Err(Error::include_path(
                format!("Circular include detected for path: {path}"),
                path,
            ));
        }

        let declared = tree.attribute(include, "type").unwrap_or("mjml");
        let kind = IncludeKind::from_str(declared).map_err(|_| {
            Error::include_path(format!("Unknown mj-include type: {declared}"), path.clone())
        })?;

        let context = match chain.last() {
            Some(parent) if depth > 0 => ResolverContext::nested(kind, parent.as_str(), depth),
            _ => ResolverContext::root(kind),
        };
        tracing::debug!(%path, %kind, depth, "resolving include");

        let content = self.resolver.resolve(&path, &context)?;
        let size = content.chars().count();
        if size > self.limits.max_input_size {
            return Err(Error::Validation(format!(
                "Included content from '{path}' exceeds maximum size ({size} > {} characters)",
                self.limits.max_input_size
            )));
        }

        chain.push(path);
        let result = match kind {
            IncludeKind::Mjml => self.splice_markup(tree, include, &content, chain, depth),
            IncludeKind::Html => {
                replace_with_block(tree, include, "mj-raw", AttributesMap::new(), &content);
                Ok(())
            }
            IncludeKind::Css | IncludeKind::CssInline => {
                let mut attrs = AttributesMap::new();
                if kind == IncludeKind::CssInline
                    || tree.attribute(include, "css-inline") == Some("inline")
                {
                    let _ = attrs.insert("inline", "inline");
                }
                replace_with_block(tree, include, "mj-style", attrs, &content);
                Ok(())
            }
        };
        let _ = chain.pop();
        result
    }

    fn splice_markup(
        &self,
        tree: &mut DomTree,
        include: NodeId,
        content: &str,
        chain: &mut Vec<String>,
        depth: usize,
    ) -> Result<()> {
        let trimmed = content.trim();
        let nesting = self.limits.max_nesting_depth;

        if trimmed.starts_with(&format!("<{ROOT_TAG}")) {
            let mut included = parse_with_depth(trimmed, nesting)?;
            let included_root = included.root();
            self.expand_children(included.tree_mut(), included_root, chain, depth + 1)?;

            let under_head = tree
                .parent(include)
                .is_some_and(|p| tree.tag_name(p) == Some(HEAD_TAG));
            let section = match included.head() {
                Some(head) if under_head => Some(head),
                _ => included.body(),
            };
            let replacements = section
                .map(|s| import_children(tree, included.tree(), s))
                .unwrap_or_default();
            let _ = tree.replace_with(include, &replacements);
            return Ok(());
        }

        let wrapped = format!("<mjml><mj-body>{trimmed}</mj-body></mjml>");
        match parse_with_depth(&wrapped, nesting) {
            Ok(mut included) => {
                if let Some(body) = included.body() {
                    self.expand_children(included.tree_mut(), body, chain, depth + 1)?;
                    let replacements = import_children(tree, included.tree(), body);
                    let _ = tree.replace_with(include, &replacements);
                }
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::Parse => {
                tracing::debug!(error = %err, "included fragment is not markup, embedding as raw");
                replace_with_block(tree, include, "mj-raw", AttributesMap::new(), trimmed);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

fn import_children(tree: &mut DomTree, source: &DomTree, parent: NodeId) -> Vec<NodeId> {
    source
        .children(parent)
        .iter()
        .map(|&child| tree.import_subtree(source, child))
        .collect()
}

/// Replace `include` by `<tag attrs>` holding `content` as one CDATA leaf.
fn replace_with_block(
    tree: &mut DomTree,
    include: NodeId,
    tag: &str,
    attrs: AttributesMap,
    content: &str,
) {
    let block = tree.create_element(tag, attrs);
    let leaf = tree.alloc(NodeType::CData(content.to_string()));
    tree.append_child(block, leaf);
    let _ = tree.replace_with(include, &[block]);
}
