//! Per-entry processing pipeline.
//!
//! Each entry moves through
//! `Start -> Validated -> MasterFetched -> Parsed -> Remuxed -> CleanedUp`,
//! and any step can end the run with a failure instead. Whatever happens,
//! [`ItemPipeline::process`] returns exactly one [`Outcome`].
//!
//! # Example
//!
//! ```ignore
//! use hlsgrab_core::pipeline::{ItemPipeline, StreamEntry};
//!
//! let pipeline = ItemPipeline::new(fetcher, remuxer, "video_files", ".");
//! let outcome = pipeline
//!     .process(StreamEntry::new("42", "Evening news", "https://cdn.example.com/v/master.m3u8"))
//!     .await;
//! println!("{:?}", outcome);
//! ```

mod error;
mod runner;
mod temp_file;
mod types;

pub use error::PipelineError;
pub use runner::ItemPipeline;
pub use temp_file::TempFile;
pub use types::{Outcome, Stage, StreamEntry};
