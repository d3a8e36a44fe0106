//! Compiler configuration.
//!
//! A [`Configuration`] is immutable once built and shared by every compile
//! a [`Compiler`](crate::Compiler) runs. Ceilings are validated when the
//! configuration is built, never during a compile.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quokka_common::{Error, Result};
use quokka_markup::include::DEFAULT_MAX_INCLUDE_DEPTH;
use quokka_markup::include::resolvers::FileSystemResolver;
use quokka_markup::{ContentResolver, DEFAULT_MAX_NESTING_DEPTH};
use serde::Deserialize;
use strum_macros::{Display, EnumString};

use crate::components::ComponentFactory;

/// Largest accepted template, in characters.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 1_048_576;

/// `lang` used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "und";

/// Text direction written on the `<html>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
    /// Let the client decide.
    #[default]
    Auto,
}

/// Settings for a [`Compiler`](crate::Compiler).
#[derive(Clone)]
pub struct Configuration {
    max_input_size: usize,
    max_nesting_depth: usize,
    max_include_depth: usize,
    sanitize_output: bool,
    language: String,
    direction: Direction,
    resolver: Option<Arc<dyn ContentResolver>>,
    custom_components: HashMap<String, ComponentFactory>,
}

impl Configuration {
    /// Start from the defaults.
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Largest accepted template or include, in characters.
    #[must_use]
    pub const fn max_input_size(&self) -> usize {
        self.max_input_size
    }

    /// Deepest element nesting the parser accepts.
    #[must_use]
    pub const fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// Deepest include chain accepted.
    #[must_use]
    pub const fn max_include_depth(&self) -> usize {
        self.max_include_depth
    }

    /// Whether attribute values are escaped and dangerous `href`s replaced.
    #[must_use]
    pub const fn sanitize_output(&self) -> bool {
        self.sanitize_output
    }

    /// Document language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Document direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Resolver for `mj-include`, if any.
    #[must_use]
    pub fn resolver(&self) -> Option<&dyn ContentResolver> {
        self.resolver.as_deref()
    }

    /// Caller-registered components by tag.
    #[must_use]
    pub const fn custom_components(&self) -> &HashMap<String, ComponentFactory> {
        &self.custom_components
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            sanitize_output: true,
            language: DEFAULT_LANGUAGE.to_string(),
            direction: Direction::Auto,
            resolver: None,
            custom_components: HashMap::new(),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<_> = self.custom_components.keys().collect();
        custom.sort();
        f.debug_struct("Configuration")
            .field("max_input_size", &self.max_input_size)
            .field("max_nesting_depth", &self.max_nesting_depth)
            .field("max_include_depth", &self.max_include_depth)
            .field("sanitize_output", &self.sanitize_output)
            .field("language", &self.language)
            .field("direction", &self.direction)
            .field("resolver", &self.resolver.is_some())
            .field("custom_components", &custom)
            .finish()
    }
}

/// Builder for [`Configuration`].
#[derive(Default)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    /// Largest accepted template or include, in characters.
    #[must_use]
    pub const fn max_input_size(mut self, size: usize) -> Self {
        self.config.max_input_size = size;
        self
    }

    /// Deepest element nesting the parser accepts.
    #[must_use]
    pub const fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    /// Deepest include chain accepted.
    #[must_use]
    pub const fn max_include_depth(mut self, depth: usize) -> Self {
        self.config.max_include_depth = depth;
        self
    }

    /// Escape attribute values and neutralise script `href`s (on by default).
    #[must_use]
    pub fn sanitize_output(mut self, sanitize: bool) -> Self {
        if !sanitize {
            tracing::warn!("output sanitization disabled; attribute values are emitted unescaped");
        }
        self.config.sanitize_output = sanitize;
        self
    }

    /// Document language. Blank falls back to `und`.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.config.language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language
        };
        self
    }

    /// Document direction.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Resolver for `mj-include`. Without one, includes stay unexpanded.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn ContentResolver>) -> Self {
        self.config.resolver = Some(resolver);
        self
    }

    /// Register a custom component for `tag`, taking precedence over a
    /// built-in of the same name.
    #[must_use]
    pub fn component(mut self, tag: impl Into<String>, factory: ComponentFactory) -> Self {
        let _ = self.config.custom_components.insert(tag.into(), factory);
        self
    }

    /// Validate and finish.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when any ceiling is zero.
    pub fn build(self) -> Result<Configuration> {
        let config = self.config;
        for (name, value) in [
            ("max_input_size", config.max_input_size),
            ("max_nesting_depth", config.max_nesting_depth),
            ("max_include_depth", config.max_include_depth),
        ] {
            if value == 0 {
                return Err(Error::Configuration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if let Some(tag) = config.custom_components.keys().find(|t| t.trim().is_empty()) {
            return Err(Error::Configuration(format!(
                "custom component tag cannot be blank: {tag:?}"
            )));
        }
        Ok(config)
    }
}

/// Scalar settings loaded from a JSON file.
///
/// ```json
/// { "max_input_size": 65536, "language": "en", "direction": "ltr", "include_root": "partials" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// See [`ConfigurationBuilder::max_input_size`].
    pub max_input_size: Option<usize>,
    /// See [`ConfigurationBuilder::max_nesting_depth`].
    pub max_nesting_depth: Option<usize>,
    /// See [`ConfigurationBuilder::max_include_depth`].
    pub max_include_depth: Option<usize>,
    /// See [`ConfigurationBuilder::sanitize_output`].
    pub sanitize_output: Option<bool>,
    /// See [`ConfigurationBuilder::language`].
    pub language: Option<String>,
    /// See [`ConfigurationBuilder::direction`].
    pub direction: Option<Direction>,
    /// Directory served by a [`FileSystemResolver`].
    pub include_root: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse JSON text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON or unknown fields.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| Error::Configuration(format!("invalid configuration file: {err}")))
    }

    /// Read and parse `path`. A relative `include_root` is taken relative
    /// to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be read, or a
    /// configuration error when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = Self::from_json(&fs::read_to_string(path)?)?;
        let base = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(base) = base {
            file.include_root = file
                .include_root
                .map(|root| if root.is_relative() { base.join(root) } else { root });
        }
        Ok(file)
    }

    /// Layer the values that are set onto `builder`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when `include_root` does not exist.
    pub fn apply(&self, mut builder: ConfigurationBuilder) -> Result<ConfigurationBuilder> {
        if let Some(size) = self.max_input_size {
            builder = builder.max_input_size(size);
        }
        if let Some(depth) = self.max_nesting_depth {
            builder = builder.max_nesting_depth(depth);
        }
        if let Some(depth) = self.max_include_depth {
            builder = builder.max_include_depth(depth);
        }
        if let Some(sanitize) = self.sanitize_output {
            builder = builder.sanitize_output(sanitize);
        }
        if let Some(language) = &self.language {
            builder = builder.language(language.clone());
        }
        if let Some(direction) = self.direction {
            builder = builder.direction(direction);
        }
        if let Some(root) = &self.include_root {
            builder = builder.resolver(Arc::new(FileSystemResolver::new(root)?));
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_direction_parses_case_insensitively() {
        assert_eq!(Direction::from_str("RTL").unwrap(), Direction::Rtl);
        assert_eq!(Direction::from_str("auto").unwrap(), Direction::Auto);
        assert!(Direction::from_str("sideways").is_err());
        assert_eq!(Direction::Ltr.to_string(), "ltr");
    }

    #[test]
    fn test_blank_language_falls_back() {
        let config = Configuration::builder().language("  ").build().unwrap();
        assert_eq!(config.language(), DEFAULT_LANGUAGE);
    }
}
