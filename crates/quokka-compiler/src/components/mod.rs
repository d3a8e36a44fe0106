//! Tag to component dispatch.
//!
//! Built-in tags form the closed [`BuiltinComponent`] set. Callers extend it
//! with [`CustomComponent`]s created by a [`ComponentFactory`], looked up by
//! tag through the [`ComponentRegistry`]. Head components only mutate the
//! [`DocumentContext`](quokka_core::DocumentContext); body components render
//! HTML fragments.

mod body;
mod column;
mod content;
pub(crate) mod head;
mod registry;
mod section;
mod style;
mod vml;

use std::sync::Arc;

use quokka_common::Result;
use quokka_core::{Cascade, DocumentContext, RenderContext};
use quokka_dom::NodeId;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

pub(crate) use body::BodyRenderer;
pub use registry::{ComponentKind, ComponentRegistry};

/// A caller-supplied body component.
///
/// Custom components are leaves: they read their attributes through the
/// cascade and return one HTML fragment.
pub trait CustomComponent {
    /// Built-in defaults, the last cascade level.
    fn default_attributes(&self) -> &[(&'static str, &'static str)] {
        &[]
    }

    /// Render the component.
    ///
    /// # Errors
    ///
    /// Any error aborts the compile.
    fn render(&self, attributes: Cascade<'_>, context: &RenderContext) -> Result<String>;
}

/// Creates a [`CustomComponent`] for one node.
pub type ComponentFactory = Arc<
    dyn Fn(NodeId, &DocumentContext, &RenderContext) -> Box<dyn CustomComponent> + Send + Sync,
>;

/// Every tag the compiler understands out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum BuiltinComponent {
    /// `mj-head`
    #[strum(serialize = "mj-head")]
    Head,
    /// `mj-title`
    #[strum(serialize = "mj-title")]
    Title,
    /// `mj-preview`
    #[strum(serialize = "mj-preview")]
    Preview,
    /// `mj-breakpoint`
    #[strum(serialize = "mj-breakpoint")]
    Breakpoint,
    /// `mj-font`
    #[strum(serialize = "mj-font")]
    Font,
    /// `mj-style`
    #[strum(serialize = "mj-style")]
    Style,
    /// `mj-attributes`
    #[strum(serialize = "mj-attributes")]
    Attributes,
    /// `mj-html-attributes`
    #[strum(serialize = "mj-html-attributes")]
    HtmlAttributes,
    /// `mj-raw`, valid in head and body.
    #[strum(serialize = "mj-raw")]
    Raw,
    /// `mj-body`
    #[strum(serialize = "mj-body")]
    Body,
    /// `mj-section`
    #[strum(serialize = "mj-section")]
    Section,
    /// `mj-column`
    #[strum(serialize = "mj-column")]
    Column,
    /// `mj-group`
    #[strum(serialize = "mj-group")]
    Group,
    /// `mj-wrapper`
    #[strum(serialize = "mj-wrapper")]
    Wrapper,
    /// `mj-text`
    #[strum(serialize = "mj-text")]
    Text,
    /// `mj-image`
    #[strum(serialize = "mj-image")]
    Image,
    /// `mj-button`
    #[strum(serialize = "mj-button")]
    Button,
    /// `mj-divider`
    #[strum(serialize = "mj-divider")]
    Divider,
    /// `mj-spacer`
    #[strum(serialize = "mj-spacer")]
    Spacer,
    /// `mj-table`
    #[strum(serialize = "mj-table")]
    Table,
}

impl BuiltinComponent {
    /// The built-in for `tag`, if there is one.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }

    /// The tag name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Whether the component is processed inside `mj-head`.
    #[must_use]
    pub const fn is_head(self) -> bool {
        matches!(
            self,
            Self::Head
                | Self::Title
                | Self::Preview
                | Self::Breakpoint
                | Self::Font
                | Self::Style
                | Self::Attributes
                | Self::HtmlAttributes
                | Self::Raw
        )
    }

    /// Built-in attribute defaults. Head components have none.
    #[must_use]
    pub const fn default_attributes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Body => body::BODY_DEFAULTS,
            Self::Section => section::SECTION_DEFAULTS,
            Self::Wrapper => section::WRAPPER_DEFAULTS,
            Self::Column => column::COLUMN_DEFAULTS,
            Self::Group => column::GROUP_DEFAULTS,
            Self::Text => content::TEXT_DEFAULTS,
            Self::Image => content::IMAGE_DEFAULTS,
            Self::Button => content::BUTTON_DEFAULTS,
            Self::Divider => content::DIVIDER_DEFAULTS,
            Self::Spacer => content::SPACER_DEFAULTS,
            Self::Table => content::TABLE_DEFAULTS,
            Self::Raw => content::RAW_DEFAULTS,
            Self::Head
            | Self::Title
            | Self::Preview
            | Self::Breakpoint
            | Self::Font
            | Self::Style
            | Self::Attributes
            | Self::HtmlAttributes => &[],
        }
    }
}
