//! Fetcher module for retrieving remote resources to local storage.
//!
//! This module provides the `Fetcher` trait and an HTTP implementation that
//! streams response bodies to disk chunk by chunk, never holding a whole
//! body in memory.
//!
//! # Features
//!
//! - Streaming writes to an exclusively owned destination file
//! - Transfer size from `Content-Length` when the server reports one
//! - Progress reporting through a lossy side channel
//!
//! # Example
//!
//! ```ignore
//! use hlsgrab_core::fetcher::{Fetcher, FetcherConfig, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new(FetcherConfig::default())?;
//!
//! let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel(64);
//! let result = fetcher
//!     .fetch("https://cdn.example.com/master.m3u8", Path::new("master.m3u8"), Some(progress_tx))
//!     .await?;
//! println!("Fetched {} bytes in {} ms", result.bytes_written, result.duration_ms);
//! ```

mod config;
mod error;
mod http;
mod traits;
mod types;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use http::HttpFetcher;
pub use traits::Fetcher;
pub use types::{FetchProgress, FetchResult};
