//! Shared compile state for the Quokka compiler.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document context** ([`DocumentContext`]) - everything head processing
//!   gathers and body rendering reads: metadata, collected styles and the
//!   attribute registries
//! - **Attribute cascade** ([`cascade`]) - the five-level lookup every
//!   renderer uses to read an attribute
//! - **Render context** ([`RenderContext`]) - the narrowing per-subtree
//!   value threaded top-down through body rendering

pub mod cascade;
pub mod context;
pub mod render_context;

pub use cascade::{Cascade, expand_short_hex, resolve};
pub use context::{
    AttributeContext, CLASS_ATTRIBUTE, DocumentContext, FontDef, MediaQuery, MetadataContext,
    StyleContext, UNIVERSAL_TAG,
};
pub use render_context::RenderContext;

/// Body width used when `mj-body` does not set one.
pub const DEFAULT_CONTAINER_WIDTH: u32 = 600;

/// Breakpoint used when `mj-breakpoint` does not set one.
pub const DEFAULT_BREAKPOINT: &str = "480px";
