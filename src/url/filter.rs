//! Filtering of discovered links
//!
//! Links found on a page are resolved against the page URL, de-duplicated by
//! their normalized form and then checked against the configured ignore
//! patterns and domain restriction.

use crate::config::CrawlerConfig;
use crate::url::{extract_domain, matches_domain_pattern, normalize_url, resolve_link};
use crate::{ConfigError, PatternKind};
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Source id reported for invalid ignore patterns
const IGNORE_SOURCE: &str = "crawler.ignore";

/// One compiled ignore pattern
#[derive(Debug, Clone)]
enum IgnoreRule {
    /// Plain word, matched anywhere in the path
    Substring(String),
    /// Glob with `*` and `?`, matched against the whole path
    Glob { regex: Regex, rooted: bool },
}

impl IgnoreRule {
    fn compile(pattern: &str) -> Result<Self, ConfigError> {
        if !pattern.contains(['*', '?']) {
            return Ok(Self::Substring(pattern.to_string()));
        }

        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|e| {
            ConfigError::InvalidPattern {
                source_id: IGNORE_SOURCE.to_string(),
                kind: PatternKind::Ignore,
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self::Glob {
            regex,
            rooted: pattern.starts_with('/'),
        })
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Substring(word) => path.contains(word.as_str()),
            // "private/*" is written relative to the site root
            Self::Glob { regex, rooted: true } => regex.is_match(path),
            Self::Glob { regex, rooted: false } => regex.is_match(path.trim_start_matches('/')),
        }
    }
}

/// Converts a glob into an anchored regex
///
/// `*` becomes `.*` and `?` becomes `.`; the result is anchored at each end
/// unless that end already starts or finishes with `.*`.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut regex = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    if !regex.starts_with(".*") {
        regex.insert(0, '^');
    }
    if !regex.ends_with(".*") {
        regex.push('$');
    }
    regex
}

/// Decides which discovered links are reported to the crawl collaborator
#[derive(Debug, Clone)]
pub struct LinkFilter {
    ignore: Vec<IgnoreRule>,
    restrict_domain: bool,
    seed_hosts: HashSet<String>,
    allowed_domains: Vec<String>,
}

impl LinkFilter {
    /// Builds a filter from the crawler settings
    ///
    /// Seed hosts are always allowed; unparsable seeds are skipped here since
    /// validation reports them.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let ignore = config
            .ignore
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| IgnoreRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        let seed_hosts = config
            .seeds
            .iter()
            .filter_map(|seed| Url::parse(seed).ok())
            .filter_map(|url| extract_domain(&url))
            .collect();

        Ok(Self {
            ignore,
            restrict_domain: config.restrict_domain,
            seed_hosts,
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
        })
    }

    /// True when an ignore pattern matches the URL path
    pub fn is_ignored(&self, url: &Url) -> bool {
        let path = url.path();
        self.ignore.iter().any(|rule| rule.matches(path))
    }

    /// True when the URL host passes the domain restriction
    pub fn is_allowed_domain(&self, url: &Url) -> bool {
        if !self.restrict_domain {
            return true;
        }

        let Some(host) = extract_domain(url) else {
            return false;
        };

        self.seed_hosts.contains(&host)
            || self
                .allowed_domains
                .iter()
                .any(|pattern| matches_domain_pattern(pattern, &host))
    }

    pub fn accepts(&self, url: &Url) -> bool {
        !self.is_ignored(url) && self.is_allowed_domain(url)
    }

    /// Resolves, de-duplicates and filters the hrefs found on `base`
    ///
    /// Order of first appearance is kept.
    pub fn filter_links<'a>(&self, base: &Url, hrefs: impl IntoIterator<Item = &'a str>) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();

        for href in hrefs {
            let Some(url) = resolve_link(href, base) else {
                continue;
            };
            let key = normalize_url(url.as_str())
                .map(|u| u.to_string())
                .unwrap_or_else(|_| url.to_string());
            if !seen.insert(key) {
                continue;
            }
            if self.accepts(&url) {
                accepted.push(url);
            } else {
                tracing::trace!(url = %url, "Link filtered out");
            }
        }

        accepted
    }
}
