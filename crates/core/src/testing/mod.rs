//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the fetcher and remuxer
//! traits so pipelines and batches can be exercised without network access
//! or an FFmpeg binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use hlsgrab_core::testing::{fixtures, ConcurrencyProbe, MockFetcher, MockRemuxer};
//!
//! let probe = ConcurrencyProbe::new();
//! let fetcher = MockFetcher::new().with_probe(probe.clone());
//! let remuxer = MockRemuxer::new().with_probe(probe.clone());
//!
//! fetcher
//!     .set_response("https://cdn.example.com/master.m3u8", fixtures::master_playlist(&[(500_000, "a.m3u8")]))
//!     .await;
//!
//! // Run a batch...
//! assert!(probe.max_observed() <= 5);
//! ```

mod mock_fetcher;
mod mock_remuxer;
mod probe;

pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_remuxer::{MockRemuxer, RecordedRemux};
pub use probe::{ConcurrencyProbe, ProbeGuard};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::pipeline::StreamEntry;

    /// Builds a master playlist with one stream-info tag per
    /// `(bandwidth, uri)` pair.
    pub fn master_playlist(variants: &[(u64, &str)]) -> String {
        let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");
        for (bandwidth, uri) in variants {
            text.push_str(&format!(
                "#EXT-X-STREAM-INF:BANDWIDTH={},CODECS=\"avc1.4d401f,mp4a.40.2\"\n{}\n",
                bandwidth, uri
            ));
        }
        text
    }

    /// Builds `count` entries whose master playlists live under
    /// `https://cdn.example.com/<n>/master.m3u8`.
    pub fn entries(count: usize) -> Vec<StreamEntry> {
        (0..count)
            .map(|n| {
                StreamEntry::new(
                    n.to_string(),
                    format!("Stream {}", n),
                    format!("https://cdn.example.com/{}/master.m3u8", n),
                )
            })
            .collect()
    }
}
