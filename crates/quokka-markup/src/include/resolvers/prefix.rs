use std::sync::Arc;

use quokka_common::{Error, Result};

use crate::include::{ContentResolver, ResolverContext};

/// Routes a path to a delegate by prefix, stripping the prefix.
///
/// Routes are tried in registration order; unmatched paths go to the default
/// delegate, if any.
pub struct PrefixResolver {
    routes: Vec<(String, Arc<dyn ContentResolver>)>,
    fallback: Option<Arc<dyn ContentResolver>>,
}

impl PrefixResolver {
    /// Start building a router.
    #[must_use]
    pub fn builder() -> PrefixResolverBuilder {
        PrefixResolverBuilder::default()
    }
}

impl ContentResolver for PrefixResolver {
    fn resolve(&self, path: &str, context: &ResolverContext) -> Result<String> {
        for (prefix, delegate) in &self.routes {
            if let Some(stripped) = path.strip_prefix(prefix.as_str()) {
                return delegate.resolve(stripped, context);
            }
        }
        match &self.fallback {
            Some(fallback) => fallback.resolve(path, context),
            None => Err(Error::include_path(
                format!("No resolver matched prefix for path: {path}"),
                path,
            )),
        }
    }
}

/// Builder for [`PrefixResolver`].
#[derive(Default)]
pub struct PrefixResolverBuilder {
    routes: Vec<(String, Arc<dyn ContentResolver>)>,
    fallback: Option<Arc<dyn ContentResolver>>,
}

impl PrefixResolverBuilder {
    /// Send paths starting with `prefix` to `resolver`.
    #[must_use]
    pub fn route(mut self, prefix: impl Into<String>, resolver: Arc<dyn ContentResolver>) -> Self {
        self.routes.push((prefix.into(), resolver));
        self
    }

    /// Delegate for paths no route matches.
    #[must_use]
    pub fn fallback(mut self, resolver: Arc<dyn ContentResolver>) -> Self {
        self.fallback = Some(resolver);
        self
    }

    /// Finish the router.
    #[must_use]
    pub fn build(self) -> PrefixResolver {
        PrefixResolver {
            routes: self.routes,
            fallback: self.fallback,
        }
    }
}
