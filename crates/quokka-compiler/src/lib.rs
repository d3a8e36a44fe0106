//! Email markup to HTML compiler.
//!
//! # Scope
//!
//! This crate provides:
//! - **Configuration** ([`Configuration`], [`ConfigFile`]) - ceilings,
//!   sanitization, language, direction, include resolver and custom tags
//! - **Components** ([`components`]) - the built-in head and body
//!   components plus the [`CustomComponent`](components::CustomComponent)
//!   extension point
//! - **Pipeline** ([`Compiler`]) - parse, expand includes, process the
//!   head, render the body, assemble and inline
//!
//! ```no_run
//! use quokka_compiler::{Compiler, Configuration};
//!
//! # fn main() -> quokka_common::Result<()> {
//! let compiler = Compiler::new(Configuration::default())?;
//! let output = compiler.compile("<mjml><mj-body><mj-section><mj-column>\
//!     <mj-text>Hello</mj-text></mj-column></mj-section></mj-body></mjml>")?;
//! assert!(output.html.contains("Hello"));
//! # Ok(())
//! # }
//! ```

pub mod components;
pub mod config;
pub mod fonts;
mod html_attributes;
pub mod pipeline;
mod skeleton;

pub use components::{
    BuiltinComponent, ComponentFactory, ComponentKind, ComponentRegistry, CustomComponent,
};
pub use config::{ConfigFile, Configuration, ConfigurationBuilder, Direction};
pub use pipeline::{CompileOutput, Compiler};
pub use quokka_markup::include::resolvers;
pub use quokka_markup::{ContentResolver, IncludeKind, ResolverContext};
