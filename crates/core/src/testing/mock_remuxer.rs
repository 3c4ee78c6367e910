//! Mock remuxer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::remux::{RemuxError, RemuxJob, RemuxResult, Remuxer};

use super::probe::ConcurrencyProbe;

/// A recorded remux job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRemux {
    /// The job that was submitted.
    pub job: RemuxJob,
    /// Whether the remux succeeded.
    pub success: bool,
}

/// Mock implementation of the Remuxer trait.
///
/// Records every job and, on success, writes the input URL into the output
/// file as a stand-in for media.
#[derive(Debug, Clone)]
pub struct MockRemuxer {
    remuxes: Arc<RwLock<Vec<RecordedRemux>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<RemuxError>>>,
    /// Simulated remux duration in milliseconds.
    delay_ms: Arc<RwLock<u64>>,
    probe: Option<ConcurrencyProbe>,
}

impl Default for MockRemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemuxer {
    /// Create a new mock remuxer.
    pub fn new() -> Self {
        Self {
            remuxes: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay_ms: Arc::new(RwLock::new(0)),
            probe: None,
        }
    }

    /// Count in-flight remuxes on `probe`.
    pub fn with_probe(mut self, probe: ConcurrencyProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: RemuxError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated remux duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Get all recorded remuxes.
    pub async fn recorded_remuxes(&self) -> Vec<RecordedRemux> {
        self.remuxes.read().await.clone()
    }

    /// Get the jobs of all recorded remuxes.
    pub async fn recorded_jobs(&self) -> Vec<RemuxJob> {
        self.remuxes
            .read()
            .await
            .iter()
            .map(|r| r.job.clone())
            .collect()
    }
}

#[async_trait]
impl Remuxer for MockRemuxer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        let _in_flight = self.probe.as_ref().map(|p| p.enter());

        let delay_ms = *self.delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            self.remuxes.write().await.push(RecordedRemux {
                job,
                success: false,
            });
            return Err(err);
        }

        tokio::fs::write(&job.output_path, job.input_url.as_bytes()).await?;

        self.remuxes.write().await.push(RecordedRemux {
            job: job.clone(),
            success: true,
        });

        Ok(RemuxResult {
            output_size_bytes: Some(job.input_url.len() as u64),
            job_id: job.job_id,
            output_path: job.output_path,
            duration_ms: delay_ms,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        Ok(())
    }
}
