//! Scoped temporary file handle.

use std::path::{Path, PathBuf};
use tracing::warn;

/// A file path that is removed when the handle goes out of scope.
///
/// [`TempFile::remove`] removes the file explicitly and reports errors;
/// dropping the handle without calling it removes the file best effort.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    /// Takes ownership of `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file now, returning any error.
    pub async fn remove(mut self) -> std::io::Result<()> {
        self.armed = false;
        tokio::fs::remove_file(&self.path).await
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove temporary file");
            }
        }
    }
}
