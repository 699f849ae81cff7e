use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure for Page-Scribe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Extraction overrides keyed by source identifier (host)
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
    /// Request headers and cookies keyed by host
    #[serde(default)]
    pub domains: HashMap<String, DomainConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// URLs to fetch and convert
    pub seeds: Vec<String>,

    /// Maximum number of documents fetched and extracted at once
    pub parallel: u32,

    /// Only report discovered links on seed hosts and allowed domains
    pub restrict_domain: bool,

    /// Extra hosts links may point to ("example.com" or "*.example.com")
    pub allowed_domains: Vec<String>,

    /// URL patterns whose links are never reported
    pub ignore: Vec<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            parallel: 8,
            restrict_domain: true,
            allowed_domains: Vec::new(),
            ignore: ["login", "admin", "logout", "/api/", "*.pdf", "private/*"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    pub crawler_name: String,
    pub crawler_version: String,
    pub contact_url: Option<String>,
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "PageScribe".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version`, followed by `(+url; email)` when contact details are set.
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Root directory; artifacts land in `{directory}/{host}/{name}.md`
    pub directory: String,

    /// Minimum artifact age before a URL is fetched again
    #[serde(deserialize_with = "deserialize_duration")]
    pub rescrape_after: Duration,

    /// Refetch regardless of artifact age
    pub force: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./scraped-content".to_string(),
            rescrape_after: Duration::from_secs(12 * 60 * 60),
            force: false,
        }
    }
}

/// Regex overrides for one source
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuleConfig {
    /// Regex with one capture group applied to the document markup
    pub title_pattern: Option<String>,

    /// Regexes whose matches, concatenated, form the page content
    pub content_patterns: Vec<String>,

    /// Regexes removed from the concatenated content
    pub exclude_patterns: Vec<String>,
}

/// Extra request data for one host
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Parses durations such as `"12h"`, `"90s"`, `"1h30m"` or `"2d"`
///
/// Units: `ms`, `s`, `m`, `h`, `d`. Every number needs a unit.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration cannot be empty".to_string());
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = input;

    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return Err(format!("invalid duration '{}': expected a number", input));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|_| format!("invalid duration '{}': number too large", input))?;
        rest = &rest[digits..];

        let unit_len = rest.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let segment = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value * 60),
            "h" => Duration::from_secs(value * 60 * 60),
            "d" => Duration::from_secs(value * 24 * 60 * 60),
            "" => {
                return Err(format!("invalid duration '{}': missing unit", input));
            }
            other => {
                return Err(format!("invalid duration '{}': unknown unit '{}'", input, other));
            }
        };
        total += segment;
    }

    Ok(total)
}
