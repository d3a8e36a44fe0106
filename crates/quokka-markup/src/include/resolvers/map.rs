use std::collections::HashMap;

use quokka_common::{Error, Result};

use crate::include::{ContentResolver, ResolverContext};

/// Serves includes from an in-memory path to content map.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    templates: HashMap<String, String>,
}

impl MapResolver {
    /// Empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the content served for `path`.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let _ = self.templates.insert(path.into(), content.into());
        self
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self {
            templates: iter
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}

impl ContentResolver for MapResolver {
    fn resolve(&self, path: &str, _context: &ResolverContext) -> Result<String> {
        self.templates.get(path).cloned().ok_or_else(|| {
            Error::include_path(format!("Template not found in map: {path}"), path)
        })
    }
}
