//! Line classifying master playlist parser.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::error::PlaylistError;
use super::types::Variant;

const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF";

// Anchored on the attribute separator so AVERAGE-BANDWIDTH never matches.
static BANDWIDTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[:,])BANDWIDTH=(\d+)").expect("valid bandwidth pattern"));

/// A stream-info tag waiting for its reference line.
struct PendingTag {
    line: usize,
    bandwidth: Option<u64>,
}

/// Parses every bandwidth-tagged rendition of a master playlist, in
/// document order.
///
/// Each line is classified as blank, stream-info tag, other tag/comment or
/// reference. A stream-info tag is paired with the next reference line.
/// Tags without a `BANDWIDTH` attribute consume their reference but do not
/// produce a variant; reference lines without a preceding stream-info tag
/// are ignored.
pub fn parse_variants(text: &str) -> Result<Vec<Variant>, PlaylistError> {
    let mut variants = Vec::new();
    let mut pending: Option<PendingTag> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with(STREAM_INF_TAG) {
            if let Some(tag) = pending {
                return Err(PlaylistError::MissingUri { line: tag.line });
            }
            pending = Some(PendingTag {
                line: line_no,
                bandwidth: parse_bandwidth(line, line_no)?,
            });
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if let Some(tag) = pending.take() {
            if let Some(bandwidth) = tag.bandwidth {
                variants.push(Variant {
                    bandwidth,
                    uri: line.to_string(),
                });
            }
        }
    }

    if let Some(tag) = pending {
        return Err(PlaylistError::MissingUri { line: tag.line });
    }

    Ok(variants)
}

/// Selects the rendition with the highest bandwidth.
///
/// When several renditions declare the same maximum, the one appearing last
/// in the document wins.
pub fn select_highest_bandwidth_variant(text: &str) -> Result<Variant, PlaylistError> {
    parse_variants(text)?
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.bandwidth >= best.bandwidth {
                candidate
            } else {
                best
            }
        })
        .ok_or(PlaylistError::NoVariants)
}

fn parse_bandwidth(line: &str, line_no: usize) -> Result<Option<u64>, PlaylistError> {
    let Some(caps) = BANDWIDTH_RE.captures(line) else {
        return Ok(None);
    };
    let Some(digits) = caps.get(1) else {
        return Ok(None);
    };

    digits
        .as_str()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| PlaylistError::InvalidBandwidth {
            line: line_no,
            value: digits.as_str().to_string(),
        })
}
