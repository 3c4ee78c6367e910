//! HLS master playlist parsing.
//!
//! A master playlist lists the renditions of a stream, one
//! `#EXT-X-STREAM-INF` tag per rendition followed by the rendition's
//! media playlist reference:
//!
//! ```text
//! #EXTM3U
//! #EXT-X-STREAM-INF:BANDWIDTH=500000,RESOLUTION=640x360
//! 360p.m3u8
//! #EXT-X-STREAM-INF:BANDWIDTH=1200000,RESOLUTION=1280x720
//! 720p.m3u8
//! ```
//!
//! Only the highest-bandwidth rendition is ever selected.
//!
//! # Example
//!
//! ```ignore
//! use hlsgrab_core::playlist::MasterPlaylist;
//!
//! let playlist = MasterPlaylist::new("https://cdn.example.com/videos", content);
//! let best = playlist.select_best()?;
//! println!("{} bps at {}", best.bandwidth, best.url);
//! ```

mod error;
mod parser;
mod types;

pub use error::PlaylistError;
pub use parser::{parse_variants, select_highest_bandwidth_variant};
pub use types::{MasterPlaylist, SelectedVariant, Variant};
