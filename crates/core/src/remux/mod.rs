//! Remux module for repackaging HLS streams into a single container file.
//!
//! The actual work is delegated to an external FFmpeg process running a
//! stream copy (`-c copy`): no re-encoding takes place, FFmpeg fetches the
//! media playlist and its segments itself and writes them into a new
//! container. Only the process exit status is interpreted.
//!
//! # Example
//!
//! ```ignore
//! use hlsgrab_core::remux::{FfmpegRemuxer, RemuxJob, Remuxer};
//!
//! let remuxer = FfmpegRemuxer::with_defaults();
//! remuxer.validate().await?;
//!
//! let job = RemuxJob {
//!     job_id: "42".to_string(),
//!     input_url: "https://cdn.example.com/videos/720p.m3u8".to_string(),
//!     output_path: PathBuf::from("video_files/42__Title.mp4"),
//! };
//! let result = remuxer.remux(job).await?;
//! println!("Remuxed in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::RemuxConfig;
pub use error::RemuxError;
pub use ffmpeg::FfmpegRemuxer;
pub use traits::Remuxer;
pub use types::{RemuxJob, RemuxResult};
