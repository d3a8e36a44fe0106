//! `mj-include` expansion and the content resolver seam.
//!
//! An include names external content by `path`. A [`ContentResolver`] turns
//! the path into text; the [`IncludeExpander`] parses that text and splices
//! the result into the tree where the reference stood.

mod expander;
pub mod resolvers;

use std::fmt;

use quokka_common::Result;
use strum_macros::{Display, EnumString};

pub use expander::{IncludeExpander, IncludeLimits};

/// Tag of an include reference.
pub const INCLUDE_TAG: &str = "mj-include";

/// Default ceiling on include nesting.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 50;

/// How included content is embedded, from the reference's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum IncludeKind {
    /// Template markup, spliced as nodes (the default).
    Mjml,
    /// Raw HTML, embedded as one opaque block.
    Html,
    /// A stylesheet, inlined only with `css-inline="inline"`.
    Css,
    /// A stylesheet always flagged for inlining.
    CssInline,
}

/// What a resolver knows about the reference being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverContext {
    /// Path of the include that contains this reference; `None` at top level.
    pub including_path: Option<String>,
    /// Declared embedding kind.
    pub kind: IncludeKind,
    /// Include nesting depth, 0 for references in the compiled template.
    pub depth: usize,
}

impl ResolverContext {
    /// Context for a reference in the compiled template itself.
    #[must_use]
    pub const fn root(kind: IncludeKind) -> Self {
        Self {
            including_path: None,
            kind,
            depth: 0,
        }
    }

    /// Context for a reference inside the include at `including_path`,
    /// `depth` levels below the compiled template.
    #[must_use]
    pub fn nested(kind: IncludeKind, including_path: impl Into<String>, depth: usize) -> Self {
        Self {
            including_path: Some(including_path.into()),
            kind,
            depth,
        }
    }
}

impl fmt::Display for ResolverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.including_path {
            Some(parent) => write!(f, "{} include from {parent} at depth {}", self.kind, self.depth),
            None => write!(f, "{} include at depth {}", self.kind, self.depth),
        }
    }
}

/// Fetches include content by path.
///
/// Implementations block until content is available and report missing
/// content as an include error.
pub trait ContentResolver: Send + Sync {
    /// Resolve `path` to its text.
    ///
    /// # Errors
    ///
    /// Returns an include error when the content cannot be produced.
    fn resolve(&self, path: &str, context: &ResolverContext) -> Result<String>;
}

impl<F> ContentResolver for F
where
    F: Fn(&str, &ResolverContext) -> Result<String> + Send + Sync,
{
    fn resolve(&self, path: &str, context: &ResolverContext) -> Result<String> {
        self(path, context)
    }
}
