use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetcher::FetcherConfig;
use crate::remux::RemuxConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub remux: RemuxConfig,
}

/// Batch run configuration: input table, output locations and concurrency cap
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Input table (header row + id, title, url columns)
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Directory the remuxed files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for the per-entry temporary master playlists
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    #[serde(default = "default_success_ledger")]
    pub success_ledger: PathBuf,
    #[serde(default = "default_failure_ledger")]
    pub failure_ledger: PathBuf,
    /// Maximum number of entries processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Append to existing ledgers instead of truncating them
    #[serde(default)]
    pub append_ledgers: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            success_ledger: default_success_ledger(),
            failure_ledger: default_failure_ledger(),
            concurrency: default_concurrency(),
            append_ledgers: false,
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("xyz.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("video_files")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_success_ledger() -> PathBuf {
    PathBuf::from("downloaded_files.txt")
}

fn default_failure_ledger() -> PathBuf {
    PathBuf::from("skipped_files.txt")
}

fn default_concurrency() -> usize {
    5
}
