//! Error types for the playlist module.

use thiserror::Error;

/// Errors that can occur while parsing a master playlist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// No stream-info tag carried a bandwidth attribute.
    #[error("No BANDWIDTH-tagged variant found in master playlist")]
    NoVariants,

    /// A stream-info tag is not followed by a reference line.
    #[error("#EXT-X-STREAM-INF on line {line} has no variant URI")]
    MissingUri { line: usize },

    /// The bandwidth attribute is not a valid non-negative integer.
    #[error("Invalid BANDWIDTH value on line {line}: {value}")]
    InvalidBandwidth { line: usize, value: String },
}
