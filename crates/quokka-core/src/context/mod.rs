//! Document-wide state for one compile.
//!
//! Head components write into a [`DocumentContext`]; body components and
//! the skeleton read from it. Fields are grouped by concern so code that
//! only needs fonts or media queries depends on [`StyleContext`] alone.

mod attributes;
mod metadata;
mod styles;

pub use attributes::{AttributeContext, CLASS_ATTRIBUTE, UNIVERSAL_TAG};
pub use metadata::MetadataContext;
pub use styles::{FontDef, MediaQuery, StyleContext};

/// Everything gathered while processing the head of one template.
///
/// One context exists per compile call and is never shared between calls.
#[derive(Debug, Clone, Default)]
pub struct DocumentContext {
    /// Title, preview, breakpoint and other document metadata.
    pub metadata: MetadataContext,
    /// Fonts, stylesheets and media queries.
    pub styles: StyleContext,
    /// Default, class and HTML-attribute registries.
    pub attributes: AttributeContext,
}

impl DocumentContext {
    /// An empty context with default metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
