//! Error types for the pipeline module.

use thiserror::Error;

use crate::fetcher::FetchError;
use crate::playlist::PlaylistError;
use crate::remux::RemuxError;

use super::types::Stage;

/// Every way a single entry can fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source URL was rejected before any network access.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The master playlist could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The master playlist has no usable variant.
    #[error(transparent)]
    Parse(#[from] PlaylistError),

    /// The conversion tool failed.
    #[error(transparent)]
    Remux(#[from] RemuxError),

    /// Anything else, e.g. filesystem errors around the temporary playlist.
    #[error("{message}")]
    Unknown { stage: Stage, message: String },
}

impl PipelineError {
    pub fn unknown(stage: Stage, message: impl Into<String>) -> Self {
        Self::Unknown {
            stage,
            message: message.into(),
        }
    }

    /// Stage the entry was trying to reach when this error occurred.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidUrl(_) => Stage::Validated,
            Self::Fetch(_) => Stage::MasterFetched,
            Self::Parse(_) => Stage::Parsed,
            Self::Remux(_) => Stage::Remuxed,
            Self::Unknown { stage, .. } => *stage,
        }
    }
}
