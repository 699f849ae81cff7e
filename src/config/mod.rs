//! Configuration module for Page-Scribe
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table is optional; missing values fall back to the defaults of
//! [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use page_scribe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("page-scribe.toml")).unwrap();
//! println!("Artifacts go to: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    parse_duration, Config, CrawlerConfig, DomainConfig, OutputConfig, RuleConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
