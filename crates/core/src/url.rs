//! Source URL validation and variant reference resolution.
//!
//! References are resolved by plain concatenation onto the directory of the
//! source URL. Query strings on the source URL, absolute variant references
//! and `../` segments are not handled.
//!
//! `\w` in the validation pattern is Unicode-aware, so accented path
//! segments and internationalized host names are accepted as typed.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?[\w-]+(?:\.[\w-]+)+[\w.,@?^=%&:/~+#-]*$")
        .expect("valid url pattern")
});

/// Returns true when `url` is an http(s) URL with a dotted host name and a
/// tail made only of conservative URL characters.
pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Strips everything from the last `/` onwards.
pub fn resolve_base_url(source_url: &str) -> String {
    match source_url.rfind('/') {
        Some(idx) => source_url[..idx].to_string(),
        None => source_url.to_string(),
    }
}

/// Joins a variant reference onto a base URL.
pub fn resolve_variant_url(base_url: &str, reference: &str) -> String {
    format!("{}/{}", base_url, reference)
}
