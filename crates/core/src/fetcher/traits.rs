//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::mpsc;

use super::error::FetchError;
use super::types::{FetchProgress, FetchResult};

/// Something that can copy a remote resource to a local path.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Fetches `url` into `dest`, replacing any existing file.
    ///
    /// Progress updates are best effort: if the channel is full or the
    /// receiver is gone, the transfer continues without them. On failure the
    /// destination may hold a partial body; cleaning it up is the caller's
    /// concern.
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress_tx: Option<mpsc::Sender<FetchProgress>>,
    ) -> Result<FetchResult, FetchError>;
}
