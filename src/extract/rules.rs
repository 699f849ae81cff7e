//! Per-source extraction overrides
//!
//! A [`PatternRegistry`] maps a source identifier (the host of a fetched page)
//! to an immutable [`ExtractionRuleSet`]. All regexes are compiled when the
//! registry is built; a registry with an invalid pattern is never constructed.

use crate::config::RuleConfig;
use crate::{ConfigError, PatternKind};
use regex::Regex;
use std::collections::HashMap;

/// Compiled override rules for one source
#[derive(Debug, Clone)]
pub struct ExtractionRuleSet {
    title: Option<Regex>,
    content: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl ExtractionRuleSet {
    /// Compiles a rule set, reporting the first pattern that fails
    pub fn compile(source_id: &str, rule: &RuleConfig) -> Result<Self, ConfigError> {
        let title = rule
            .title_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile_pattern(source_id, PatternKind::Title, p))
            .transpose()?;

        let content = rule
            .content_patterns
            .iter()
            .map(|p| compile_pattern(source_id, PatternKind::Content, p))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude = rule
            .exclude_patterns
            .iter()
            .map(|p| compile_pattern(source_id, PatternKind::Exclude, p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title,
            content,
            exclude,
        })
    }

    /// Title regex; its first capture group is the page title
    pub fn title_pattern(&self) -> Option<&Regex> {
        self.title.as_ref()
    }

    pub fn content_patterns(&self) -> &[Regex] {
        &self.content
    }

    pub fn exclude_patterns(&self) -> &[Regex] {
        &self.exclude
    }

    /// True when content patterns replace structural walking
    pub fn overrides_content(&self) -> bool {
        !self.content.is_empty()
    }
}

fn compile_pattern(source_id: &str, kind: PatternKind, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        source_id: source_id.to_string(),
        kind,
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Lookup table of rule sets keyed by source identifier
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    rules: HashMap<String, ExtractionRuleSet>,
}

impl PatternRegistry {
    /// Compiles every configured rule set
    ///
    /// Keys are matched case-insensitively against hosts, so they are stored
    /// lower-cased.
    pub fn from_rules(rules: &HashMap<String, RuleConfig>) -> Result<Self, ConfigError> {
        let mut compiled = HashMap::with_capacity(rules.len());
        for (source_id, rule) in rules {
            let rule_set = ExtractionRuleSet::compile(source_id, rule)?;
            compiled.insert(source_id.to_lowercase(), rule_set);
        }
        Ok(Self { rules: compiled })
    }

    /// Returns the rule set for a source, if one is configured
    pub fn lookup(&self, source_id: &str) -> Option<&ExtractionRuleSet> {
        if let Some(rules) = self.rules.get(source_id) {
            return Some(rules);
        }
        self.rules.get(&source_id.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
