//! Template front end for the Quokka compiler.
//!
//! # Scope
//!
//! This crate provides:
//! - **Preprocessing** - CDATA-wrapping of ending-tag content and named entity rewriting
//! - **Parsing** - a strict parser producing a [`MjmlDocument`]
//! - **Include expansion** - resolving `mj-include` references through a [`ContentResolver`]

pub mod document;
pub mod entities;
pub mod include;
pub mod parser;
pub mod preprocess;

pub use document::MjmlDocument;
pub use include::{
    ContentResolver, IncludeExpander, IncludeKind, IncludeLimits, ResolverContext,
};
pub use parser::{DEFAULT_MAX_NESTING_DEPTH, parse, parse_with_depth};
pub use preprocess::{ENDING_TAGS, is_ending_tag, preprocess};
