//! Types for the fetcher module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Incremental transfer progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchProgress {
    pub url: String,
    /// Bytes written to the destination so far.
    pub bytes_downloaded: u64,
    /// Total size from `Content-Length`, `None` when absent or zero.
    pub total_bytes: Option<u64>,
}

impl FetchProgress {
    /// Completion percentage, when the total size is known.
    pub fn percent(&self) -> Option<f32> {
        self.total_bytes
            .map(|total| (self.bytes_downloaded as f64 / total as f64 * 100.0).min(100.0) as f32)
    }
}

/// Result of a completed fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub url: String,
    pub path: PathBuf,
    pub bytes_written: u64,
    pub total_bytes: Option<u64>,
    pub duration_ms: u64,
}
