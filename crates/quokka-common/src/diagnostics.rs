//! Non-fatal compiler diagnostics.
//!
//! A [`Diagnostics`] sink is owned by a single compile call and passed by
//! reference to every stage that can warn. Identical messages are recorded
//! once, so a template that repeats an unknown tag fifty times yields one
//! entry. Each new entry is also mirrored to `tracing` at WARN level.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// One recorded warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The stage or component that raised it, e.g. `"registry"` or `"mj-font"`.
    pub component: String,
    /// Human readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.message)
    }
}

/// Collects de-duplicated warnings for one compile.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    seen: HashSet<String>,
}

impl Diagnostics {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning unless an identical one was already recorded.
    ///
    /// # Example
    /// ```
    /// use quokka_common::Diagnostics;
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// diagnostics.warn("registry", "Unknown MJML tag: mj-foo");
    /// diagnostics.warn("registry", "Unknown MJML tag: mj-foo");
    /// assert_eq!(diagnostics.len(), 1);
    /// ```
    pub fn warn(&mut self, component: &str, message: impl Into<String>) {
        let message = message.into();
        let key = format!("[{component}] {message}");
        if !self.seen.insert(key) {
            return;
        }
        tracing::debug!(component, "{message}");
        self.entries.push(Diagnostic {
            component: component.to_string(),
            message,
        });
    }

    /// Recorded warnings in the order they were first raised.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of distinct warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when any recorded message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }

    /// Consume the sink, yielding its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
