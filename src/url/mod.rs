//! URL handling for Page-Scribe
//!
//! Source identifiers, normalized cache keys, link resolution and the filter
//! applied to links before they are reported.

mod domain;
mod filter;
mod normalize;
mod resolve;

pub use domain::{extract_domain, matches_domain_pattern};
pub use filter::{glob_to_regex, LinkFilter};
pub use normalize::normalize_url;
pub use resolve::resolve_link;

/// Cache key of a URL
///
/// The normalized form when the URL normalizes, the trimmed input otherwise,
/// so every string still gets a stable key.
pub fn visit_key(url: &str) -> String {
    match normalize_url(url) {
        Ok(normalized) => normalized.to_string(),
        Err(_) => url.trim().to_string(),
    }
}
