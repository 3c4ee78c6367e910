//! Per-entry pipeline implementation.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::BatchConfig;
use crate::fetcher::{FetchProgress, Fetcher};
use crate::playlist::MasterPlaylist;
use crate::remux::{RemuxJob, Remuxer};
use crate::url::{is_valid_url, resolve_base_url};

use super::error::PipelineError;
use super::temp_file::TempFile;
use super::types::{Outcome, Stage, StreamEntry};

/// Runs one entry from URL validation to cleanup.
///
/// Holds no per-entry state: every run derives its temporary and output
/// paths from the entry, so runs for distinct entries never share files.
pub struct ItemPipeline<F: Fetcher, R: Remuxer> {
    fetcher: Arc<F>,
    remuxer: Arc<R>,
    output_dir: PathBuf,
    temp_dir: PathBuf,
    progress_tx: Option<mpsc::Sender<FetchProgress>>,
}

impl<F: Fetcher, R: Remuxer> ItemPipeline<F, R> {
    /// Creates a new pipeline writing outputs to `output_dir` and temporary
    /// playlists to `temp_dir`.
    pub fn new(
        fetcher: F,
        remuxer: R,
        output_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            remuxer: Arc::new(remuxer),
            output_dir: output_dir.into(),
            temp_dir: temp_dir.into(),
            progress_tx: None,
        }
    }

    /// Creates a pipeline using the directories of a batch configuration.
    pub fn from_config(config: &BatchConfig, fetcher: F, remuxer: R) -> Self {
        Self::new(
            fetcher,
            remuxer,
            config.output_dir.clone(),
            config.temp_dir.clone(),
        )
    }

    /// Forwards master playlist fetch progress to `progress_tx`.
    pub fn with_progress(mut self, progress_tx: mpsc::Sender<FetchProgress>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    /// Processes one entry. Never fails: every error becomes an
    /// [`Outcome::Failure`].
    pub async fn process(&self, entry: StreamEntry) -> Outcome {
        info!(id = %entry.id, title = %entry.title, "Processing entry");

        let outcome = match self.run(&entry).await {
            Ok(filename) => Outcome::success(&entry, filename),
            Err(e) => Outcome::failure(&entry, &e),
        };

        match &outcome {
            Outcome::Success { filename, .. } => {
                info!(id = %entry.id, filename = %filename, "Entry completed");
            }
            Outcome::Failure { reason, stage, .. } => {
                warn!(id = %entry.id, %stage, reason = %reason, "Entry failed");
            }
        }

        outcome
    }

    async fn run(&self, entry: &StreamEntry) -> Result<String, PipelineError> {
        if !is_valid_url(&entry.url) {
            return Err(PipelineError::InvalidUrl(entry.url.clone()));
        }
        debug!(id = %entry.id, stage = %Stage::Validated, "Stage reached");

        let filename = entry.output_filename();
        let output_path = self.output_dir.join(&filename);
        let playlist_file = TempFile::new(self.temp_dir.join(entry.temp_playlist_filename()));

        // Any early return below drops `playlist_file`, which removes it.
        self.fetcher
            .fetch(&entry.url, playlist_file.path(), self.progress_tx.clone())
            .await?;
        debug!(id = %entry.id, stage = %Stage::MasterFetched, "Stage reached");

        let content = tokio::fs::read_to_string(playlist_file.path())
            .await
            .map_err(|e| {
                PipelineError::unknown(
                    Stage::Parsed,
                    format!(
                        "failed to read {}: {}",
                        playlist_file.path().display(),
                        e
                    ),
                )
            })?;

        let playlist = MasterPlaylist::new(resolve_base_url(&entry.url), content);
        let selected = playlist.select_best()?;
        debug!(
            id = %entry.id,
            stage = %Stage::Parsed,
            bandwidth = selected.bandwidth,
            variant = %selected.url,
            "Stage reached"
        );

        self.remuxer
            .remux(RemuxJob {
                job_id: entry.id.clone(),
                input_url: selected.url,
                output_path,
            })
            .await?;
        debug!(id = %entry.id, stage = %Stage::Remuxed, "Stage reached");

        let temp_path = playlist_file.path().to_path_buf();
        playlist_file.remove().await.map_err(|e| {
            PipelineError::unknown(
                Stage::CleanedUp,
                format!("failed to remove {}: {}", temp_path.display(), e),
            )
        })?;
        debug!(id = %entry.id, stage = %Stage::CleanedUp, "Stage reached");

        Ok(filename)
    }
}
