//! The compiler's error type.
//!
//! Every stage returns [`Result`]. The variants are the failure kinds a
//! compile can abort with; none of them is retried internally.

use std::fmt;

use strum_macros::Display;

/// A line/column position inside markup source, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

fn location_suffix(location: Option<&SourceLocation>) -> String {
    location.map(|l| format!(" at {l}")).unwrap_or_default()
}

/// All failures a compile can raise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed markup, or a missing or wrong root element.
    #[error("{message}{}", location_suffix(.location.as_ref()))]
    Parse {
        /// Human readable description.
        message: String,
        /// Where the parser gave up, when known.
        location: Option<SourceLocation>,
    },

    /// Input size or nesting depth ceiling exceeded.
    #[error("{0}")]
    Validation(String),

    /// Missing path, resolver failure, circular include or include depth exceeded.
    #[error("{message}")]
    Include {
        /// Human readable description.
        message: String,
        /// The include path involved, when known.
        path: Option<String>,
    },

    /// Rejected at configuration-build time.
    #[error("{0}")]
    Configuration(String),

    /// A renderer could not produce output.
    #[error("{0}")]
    Render(String),

    /// I/O failure while reading included content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The kind of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// See [`Error::Parse`].
    Parse,
    /// See [`Error::Validation`].
    Validation,
    /// See [`Error::Include`].
    Include,
    /// See [`Error::Configuration`].
    Configuration,
    /// See [`Error::Render`].
    Render,
    /// See [`Error::Io`].
    Io,
}

impl Error {
    /// Parse failure without a source position.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            location: None,
        }
    }

    /// Parse failure at a known line and column.
    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: Some(SourceLocation { line, column }),
        }
    }

    /// Include failure not tied to a particular path.
    pub fn include(message: impl Into<String>) -> Self {
        Self::Include {
            message: message.into(),
            path: None,
        }
    }

    /// Include failure for `path`.
    pub fn include_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Include {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// The failure kind, for callers that branch on it.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Include { .. } => ErrorKind::Include,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Render(_) => ErrorKind::Render,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;
