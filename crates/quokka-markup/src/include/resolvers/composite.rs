use std::sync::Arc;

use quokka_common::{Error, ErrorKind, Result};

use crate::include::{ContentResolver, ResolverContext};

/// Tries each delegate in order and returns the first success.
///
/// Only include errors move on to the next delegate; any other failure is
/// returned immediately.
pub struct CompositeResolver {
    delegates: Vec<Arc<dyn ContentResolver>>,
}

impl CompositeResolver {
    /// Chain `delegates`, first one tried first.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `delegates` is empty.
    pub fn new(delegates: Vec<Arc<dyn ContentResolver>>) -> Result<Self> {
        if delegates.is_empty() {
            return Err(Error::Configuration(
                "At least one resolver is required".to_string(),
            ));
        }
        Ok(Self { delegates })
    }
}

impl ContentResolver for CompositeResolver {
    fn resolve(&self, path: &str, context: &ResolverContext) -> Result<String> {
        let mut last = None;
        for delegate in &self.delegates {
            match delegate.resolve(path, context) {
                Ok(content) => return Ok(content),
                Err(err) if err.kind() == ErrorKind::Include => last = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last.unwrap_or_else(|| Error::include_path(format!("No resolver found: {path}"), path)))
    }
}
