//! Trait definitions for the remux module.

use async_trait::async_trait;

use super::error::RemuxError;
use super::types::{RemuxJob, RemuxResult};

/// A remuxer that can stream-copy an input into a new container.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Returns the name of this remuxer implementation.
    fn name(&self) -> &str;

    /// Runs a stream copy from `job.input_url` into `job.output_path`.
    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError>;

    /// Validates that the remuxer is properly configured and ready.
    async fn validate(&self) -> Result<(), RemuxError>;
}
