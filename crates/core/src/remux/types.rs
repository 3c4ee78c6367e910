//! Types for the remux module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single stream-copy job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemuxJob {
    /// Identifier used in logs.
    pub job_id: String,
    /// Input reference handed to FFmpeg, usually a remote media playlist URL.
    pub input_url: String,
    /// Container file to write.
    pub output_path: PathBuf,
}

/// Result of a successful remux.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemuxResult {
    pub job_id: String,
    pub output_path: PathBuf,
    /// Size of the written file, when it could be read back.
    pub output_size_bytes: Option<u64>,
    pub duration_ms: u64,
}
