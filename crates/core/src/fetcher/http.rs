//! reqwest-based fetcher implementation.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tracing::debug;

use super::config::FetcherConfig;
use super::error::FetchError;
use super::traits::Fetcher;
use super::types::{FetchProgress, FetchResult};

/// HTTP(S) fetcher streaming response bodies to disk.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new HTTP fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress_tx: Option<mpsc::Sender<FetchProgress>>,
    ) -> Result<FetchResult, FetchError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length().filter(|&len| len > 0);
        debug!(url, ?total_bytes, dest = %dest.display(), "Fetching");

        let file = File::create(dest)
            .await
            .map_err(|e| FetchError::write(dest, e))?;
        let mut writer = BufWriter::new(file);

        let mut stream = response.bytes_stream();
        let mut bytes_written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::from_reqwest(url, e))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| FetchError::write(dest, e))?;
            bytes_written += chunk.len() as u64;

            if let Some(ref tx) = progress_tx {
                // Non-blocking send
                let _ = tx.try_send(FetchProgress {
                    url: url.to_string(),
                    bytes_downloaded: bytes_written,
                    total_bytes,
                });
            }
        }

        writer
            .flush()
            .await
            .map_err(|e| FetchError::write(dest, e))?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(url, bytes_written, duration_ms, "Fetch complete");

        Ok(FetchResult {
            url: url.to_string(),
            path: dest.to_path_buf(),
            bytes_written,
            total_bytes,
            duration_ms,
        })
    }
}
