//! Error types for the remux module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while remuxing.
#[derive(Debug, Error)]
pub enum RemuxError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// FFmpeg ran but exited unsuccessfully.
    #[error("FFmpeg failed with {status}")]
    NonZeroExit { status: String },

    /// FFmpeg could not be spawned or waited on.
    #[error("I/O error running FFmpeg: {0}")]
    Io(#[from] std::io::Error),
}

impl RemuxError {
    /// Creates an error from an unsuccessful exit status.
    pub fn non_zero_exit(status: std::process::ExitStatus) -> Self {
        Self::NonZeroExit {
            status: status.to_string(),
        }
    }
}
