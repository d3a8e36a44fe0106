use std::fs;
use std::path::{Path, PathBuf};

use quokka_common::{Error, Result};

use crate::include::{ContentResolver, ResolverContext};

/// Reads includes from files under a base directory.
///
/// Every path is relative to the base directory, whatever file includes it.
/// A path that resolves outside the base directory is rejected, symlinks
/// included.
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    base_dir: PathBuf,
}

impl FileSystemResolver {
    /// Resolver rooted at `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when `base_dir` does not exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            base_dir: fs::canonicalize(base_dir)?,
        })
    }

    /// The canonical base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn locate(&self, path: &str) -> Result<PathBuf> {
        let candidate = self.base_dir.join(path);
        let resolved = fs::canonicalize(&candidate)
            .map_err(|_| Error::include_path(format!("Include file not found: {path}"), path))?;
        if !resolved.starts_with(&self.base_dir) {
            return Err(Error::include_path(
                "Include path escapes base directory",
                path,
            ));
        }
        Ok(resolved)
    }
}

impl ContentResolver for FileSystemResolver {
    fn resolve(&self, path: &str, _context: &ResolverContext) -> Result<String> {
        if path.trim().is_empty() {
            return Err(Error::include("Include path cannot be empty"));
        }
        let resolved = self.locate(path)?;
        tracing::trace!(path = %resolved.display(), "reading include");
        fs::read_to_string(&resolved).map_err(|err| {
            Error::include_path(format!("Failed to read include file: {path} ({err})"), path)
        })
    }
}
