//! Types for the playlist module.

use serde::{Deserialize, Serialize};

use crate::url::resolve_variant_url;

use super::error::PlaylistError;
use super::parser::select_highest_bandwidth_variant;

/// A rendition listed in a master playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Declared peak bandwidth in bits per second.
    pub bandwidth: u64,
    /// Media playlist reference, usually relative to the master playlist.
    pub uri: String,
}

/// Raw master playlist text together with the base URL its references
/// are relative to.
#[derive(Debug, Clone)]
pub struct MasterPlaylist {
    pub base_url: String,
    pub content: String,
}

/// The chosen rendition, resolved to an absolute media playlist URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedVariant {
    pub bandwidth: u64,
    pub url: String,
}

impl MasterPlaylist {
    pub fn new(base_url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            content: content.into(),
        }
    }

    /// Selects the highest-bandwidth rendition and resolves it against the
    /// base URL.
    pub fn select_best(&self) -> Result<SelectedVariant, PlaylistError> {
        let variant = select_highest_bandwidth_variant(&self.content)?;
        Ok(SelectedVariant {
            bandwidth: variant.bandwidth,
            url: resolve_variant_url(&self.base_url, &variant.uri),
        })
    }
}
