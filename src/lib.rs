//! Page-Scribe: turns fetched web pages into clean Markdown artifacts
//!
//! This crate implements the document transformation engine (per-source
//! extraction rules, structural DOM walking, code block handling, Markdown
//! normalization) and the crawl-state cache that decides whether a URL needs
//! to be fetched again and where its artifact lives on disk.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Page-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Which list of a rule set an invalid pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Title,
    Content,
    Exclude,
    Ignore,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Exclude => "exclude",
            Self::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid {kind} pattern for '{source_id}': '{pattern}': {message}")]
    InvalidPattern {
        source_id: String,
        kind: PatternKind,
        pattern: String,
        message: String,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Page-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{derive_filename, sanitize_filename, CrawlCache};
pub use config::Config;
pub use crawler::{run_scrape, PageReport, Pipeline};
pub use extract::{Extraction, Extractor, PatternRegistry};
pub use url::{extract_domain, normalize_url};
