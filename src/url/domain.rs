use url::Url;

/// Extracts the source identifier (lower-cased host) of a URL
///
/// Returns `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_scribe::url::extract_domain;
///
/// let url = Url::parse("https://Docs.Example.COM/guide").unwrap();
/// assert_eq!(extract_domain(&url), Some("docs.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks a host against an allowed-domain pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches
/// `example.com` and every subdomain of it. Both sides are expected in
/// lower case.
///
/// ```
/// use page_scribe::url::matches_domain_pattern;
///
/// assert!(matches_domain_pattern("*.example.com", "api.v2.example.com"));
/// assert!(!matches_domain_pattern("*.example.com", "myexample.com"));
/// ```
pub fn matches_domain_pattern(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}
