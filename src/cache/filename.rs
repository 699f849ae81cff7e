use sha2::{Digest, Sha256};

/// Longest file stem produced by [`sanitize_filename`]
pub const MAX_FILENAME_LEN: usize = 100;

/// Hex characters kept from the fallback digest
pub const FALLBACK_HASH_LEN: usize = 20;

/// Turns a title into a file stem
///
/// Every character outside `[A-Za-z0-9_-]` becomes `-`, runs of `-` are
/// collapsed and trimmed, and the result is lower-cased and cut to
/// [`MAX_FILENAME_LEN`] characters. May return an empty string.
///
/// ```
/// use page_scribe::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Hello, World!"), "hello-world");
/// assert_eq!(sanitize_filename("!!!"), "");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            c.to_ascii_lowercase()
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('-');
    let truncated: String = trimmed.chars().take(MAX_FILENAME_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

/// First [`FALLBACK_HASH_LEN`] hex characters of the SHA-256 of `fallback`
pub fn hash_fallback(fallback: &str) -> String {
    let digest = Sha256::digest(fallback.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FALLBACK_HASH_LEN);
    hex
}

/// File stem for an artifact: the sanitized title, or a hash of `fallback`
/// when the title sanitizes to nothing
pub fn derive_filename(title: &str, fallback: &str) -> String {
    let name = sanitize_filename(title);
    if name.is_empty() {
        hash_fallback(fallback)
    } else {
        name
    }
}
