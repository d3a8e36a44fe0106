//! Common utilities for the Quokka email compiler.
//!
//! This crate provides shared infrastructure used by all compiler stages:
//! - **Errors** - the single [`Error`] type every stage returns
//! - **Diagnostics** - a per-compile sink for non-fatal warnings
//! - **Escaping** - HTML attribute and CSS string escaping

pub mod diagnostics;
pub mod error;
pub mod escape;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, ErrorKind, Result, SourceLocation};
