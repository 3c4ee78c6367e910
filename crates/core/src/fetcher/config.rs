//! Configuration for the fetcher module.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Capacity of the progress channel handed to fetches.
    #[serde(default = "default_progress_buffer")]
    pub progress_buffer: usize,
}

fn default_user_agent() -> String {
    concat!("hlsgrab/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_progress_buffer() -> usize {
    64
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
            progress_buffer: default_progress_buffer(),
        }
    }
}

impl FetcherConfig {
    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Sets the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
