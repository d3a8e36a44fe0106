//! The tag to component registry.

use std::collections::HashMap;
use std::fmt;

use quokka_common::{Error, Result};

use super::{BuiltinComponent, ComponentFactory};

/// What a tag resolves to.
#[derive(Clone, Copy)]
pub enum ComponentKind<'r> {
    /// A built-in component.
    Builtin(BuiltinComponent),
    /// A caller-registered component.
    Custom(&'r ComponentFactory),
}

/// Maps tags to components.
///
/// Built-ins are always present. Custom factories are registered until
/// [`freeze`](Self::freeze) is called; after that the registry is read-only
/// and can be shared between threads.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    custom: HashMap<String, ComponentFactory>,
    frozen: bool,
}

impl ComponentRegistry {
    /// A registry with only the built-ins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `tag`. A custom component shadows a built-in
    /// of the same name.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the registry is frozen.
    pub fn register(&mut self, tag: impl Into<String>, factory: ComponentFactory) -> Result<()> {
        let tag = tag.into();
        if self.frozen {
            return Err(Error::Configuration(format!(
                "component registry is frozen; cannot register <{tag}>"
            )));
        }
        tracing::debug!(%tag, "registering custom component");
        let _ = self.custom.insert(tag, factory);
        Ok(())
    }

    /// Reject further registrations.
    pub const fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether [`freeze`](Self::freeze) was called.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The component for `tag`, custom registrations first.
    #[must_use]
    pub fn lookup(&self, tag: &str) -> Option<ComponentKind<'_>> {
        self.custom
            .get(tag)
            .map(ComponentKind::Custom)
            .or_else(|| BuiltinComponent::from_tag(tag).map(ComponentKind::Builtin))
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<_> = self.custom.keys().collect();
        custom.sort();
        f.debug_struct("ComponentRegistry")
            .field("custom", &custom)
            .field("frozen", &self.frozen)
            .finish()
    }
}
