use url::Url;

/// Schemes of hrefs that never point at a document
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves an href found on the page at `base` to an absolute URL
///
/// Returns `None` for empty and fragment-only hrefs, for `javascript:`,
/// `mailto:`, `tel:` and `data:` links, and for anything that does not
/// resolve to an http(s) URL.
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let resolved = base.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}
