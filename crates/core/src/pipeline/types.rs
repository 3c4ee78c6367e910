//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::PipelineError;

/// One row of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEntry {
    /// Unique identifier, also used to derive file names.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Master playlist URL.
    pub url: String,
}

impl StreamEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }

    /// `<id>__<title with spaces replaced by underscores>.mp4`
    ///
    /// No other characters are escaped. A `/` in the title or identifier
    /// points into a subdirectory that is never created, so such an entry
    /// fails when its temporary playlist is written.
    pub fn output_filename(&self) -> String {
        format!("{}__{}.mp4", self.id, self.title.replace(' ', "_"))
    }

    /// Name of the temporary master playlist for this entry.
    pub fn temp_playlist_filename(&self) -> String {
        format!("temp_{}.m3u8", self.output_filename())
    }
}

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Validated,
    MasterFetched,
    Parsed,
    Remuxed,
    CleanedUp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Validated => "validated",
            Stage::MasterFetched => "master_fetched",
            Stage::Parsed => "parsed",
            Stage::Remuxed => "remuxed",
            Stage::CleanedUp => "cleaned_up",
        };
        f.write_str(name)
    }
}

/// Terminal result of processing one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        entry_id: String,
        filename: String,
    },
    Failure {
        entry_id: String,
        reason: String,
        /// Stage that could not be reached.
        stage: Stage,
    },
}

impl Outcome {
    pub fn success(entry: &StreamEntry, filename: impl Into<String>) -> Self {
        Self::Success {
            entry_id: entry.id.clone(),
            filename: filename.into(),
        }
    }

    /// Builds the failure outcome for `error`, with the ledger wording:
    /// `Invalid URL: <url>` or `Error processing URL <url>: <detail>`.
    pub fn failure(entry: &StreamEntry, error: &PipelineError) -> Self {
        let reason = match error {
            PipelineError::InvalidUrl(_) => error.to_string(),
            _ => format!("Error processing URL {}: {}", entry.url, error),
        };
        Self::Failure {
            entry_id: entry.id.clone(),
            reason,
            stage: error.stage(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn entry_id(&self) -> &str {
        match self {
            Self::Success { entry_id, .. } | Self::Failure { entry_id, .. } => entry_id,
        }
    }
}
