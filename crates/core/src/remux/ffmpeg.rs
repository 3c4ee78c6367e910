//! FFmpeg-based remuxer implementation.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::config::RemuxConfig;
use super::error::RemuxError;
use super::traits::Remuxer;
use super::types::{RemuxJob, RemuxResult};

/// FFmpeg-based remuxer implementation.
pub struct FfmpegRemuxer {
    config: RemuxConfig,
}

impl FfmpegRemuxer {
    /// Creates a new FFmpeg remuxer with the given configuration.
    pub fn new(config: RemuxConfig) -> Self {
        Self { config }
    }

    /// Creates a remuxer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RemuxConfig::default())
    }

    /// Builds ffmpeg arguments for a stream copy.
    fn build_args(&self, job: &RemuxJob) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ];

        if self.config.overwrite {
            args.push("-y".to_string());
        }

        args.extend([
            "-i".to_string(),
            job.input_url.clone(),
            "-c".to_string(),
            "copy".to_string(),
        ]);

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> RemuxError {
        if e.kind() == std::io::ErrorKind::NotFound {
            RemuxError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            RemuxError::Io(e)
        }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        let start = Instant::now();

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|source| {
                    RemuxError::OutputDirectoryFailed {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let args = self.build_args(&job);
        debug!(job_id = %job.job_id, ?args, "Running ffmpeg");

        // Output is left to the terminal, only the exit status matters
        let status = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !status.success() {
            return Err(RemuxError::non_zero_exit(status));
        }

        let output_size_bytes = tokio::fs::metadata(&job.output_path)
            .await
            .ok()
            .map(|m| m.len());

        Ok(RemuxResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(RemuxError::non_zero_exit(output.status));
        }

        Ok(())
    }
}
