//! Mock fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use crate::fetcher::{FetchError, FetchProgress, FetchResult, Fetcher};

use super::probe::ConcurrencyProbe;

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub url: String,
    pub dest: PathBuf,
    /// Whether the fetch succeeded.
    pub success: bool,
}

/// Mock implementation of the Fetcher trait.
///
/// Serves canned bodies by URL and answers HTTP 404 for anything else.
/// Clones share state, so a test can keep a handle while the pipeline owns
/// another.
#[derive(Debug, Clone)]
pub struct MockFetcher {
    /// Canned bodies by URL.
    responses: Arc<RwLock<HashMap<String, String>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
    /// Simulated transfer duration in milliseconds.
    delay_ms: Arc<RwLock<u64>>,
    probe: Option<ConcurrencyProbe>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay_ms: Arc::new(RwLock::new(0)),
            probe: None,
        }
    }

    /// Count in-flight fetches on `probe`.
    pub fn with_probe(mut self, probe: ConcurrencyProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Serve `body` for `url`.
    pub async fn set_response(&self, url: impl Into<String>, body: impl Into<String>) {
        self.responses.write().await.insert(url.into(), body.into());
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated transfer duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    async fn record(&self, url: &str, dest: &Path, success: bool) {
        self.fetches.write().await.push(RecordedFetch {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            success,
        });
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress_tx: Option<mpsc::Sender<FetchProgress>>,
    ) -> Result<FetchResult, FetchError> {
        let _in_flight = self.probe.as_ref().map(|p| p.enter());

        let delay_ms = *self.delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            self.record(url, dest, false).await;
            return Err(err);
        }

        let body = self.responses.read().await.get(url).cloned();
        let Some(body) = body else {
            self.record(url, dest, false).await;
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            });
        };

        tokio::fs::write(dest, body.as_bytes())
            .await
            .map_err(|e| FetchError::write(dest, e))?;

        let bytes_written = body.len() as u64;
        if let Some(tx) = progress_tx {
            let _ = tx.try_send(FetchProgress {
                url: url.to_string(),
                bytes_downloaded: bytes_written,
                total_bytes: Some(bytes_written),
            });
        }

        self.record(url, dest, true).await;

        Ok(FetchResult {
            url: url.to_string(),
            path: dest.to_path_buf(),
            bytes_written,
            total_bytes: Some(bytes_written),
            duration_ms: delay_ms,
        })
    }
}
