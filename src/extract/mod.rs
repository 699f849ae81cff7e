//! Document transformation
//!
//! Turns a parsed HTML document into a title, a normalized Markdown body and
//! the set of links it contains. Sources with configured override rules are
//! handled by regex; everything else goes through the structural walk.

pub mod code;
pub mod normalize;
pub mod rules;
pub mod structural;

pub use code::{detect_language, normalize_indentation, CodeRegion};
pub use rules::{ExtractionRuleSet, PatternRegistry};
pub use structural::{Block, Body, LinkSet};

use scraper::Html;

/// Result of transforming one document
#[derive(Debug, Clone)]
pub struct Extraction {
    pub title: String,
    /// Normalized Markdown body
    pub markdown: String,
    pub links: LinkSet,
}

/// Transforms documents using a fixed set of per-source rules
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    registry: PatternRegistry,
}

impl Extractor {
    pub fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Extracts a parsed document
    ///
    /// `source_id` selects the override rules (usually the page host) and
    /// `fallback_title` is used when the document has no usable title.
    pub fn extract(&self, source_id: &str, document: &Html, fallback_title: &str) -> Extraction {
        let rules = self.registry.lookup(source_id);
        let structured = structural::extract(rules, document, fallback_title);

        let raw = match &structured.body {
            Body::Override(text) => {
                tracing::debug!(source = source_id, "Using content override patterns");
                text.clone()
            }
            Body::Blocks(blocks) => structural::render_blocks(blocks),
        };

        Extraction {
            title: structured.title,
            markdown: normalize::normalize(&raw),
            links: structured.links,
        }
    }

    /// Parses and extracts an HTML string
    pub fn extract_html(&self, source_id: &str, html: &str, fallback_title: &str) -> Extraction {
        let document = Html::parse_document(html);
        self.extract(source_id, &document, fallback_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use std::collections::HashMap;

    #[test]
    fn test_extract_full_page() {
        let html = r#"<html><title>T</title><body><h1>T</h1><p>Hi</p><pre><code class="language-py">x=1</code></pre><a href="/x">link</a></body></html>"#;
        let extraction = Extractor::default().extract_html("example.com", html, "/");

        assert_eq!(extraction.title, "T");
        assert_eq!(
            extraction.markdown,
            "# T\n\nHi\n\n```py\nx=1\n```\n\n## Links\n\n[link](/x)"
        );
        assert_eq!(extraction.links.get("link"), Some("/x"));
        assert_eq!(extraction.markdown.matches("# T").count(), 1);
    }

    #[test]
    fn test_extract_lists_and_paragraphs() {
        let html = "<html><body><main><h2>Steps</h2><ol><li>one</li><li>two</li></ol><p>Done</p></main></body></html>";
        let extraction = Extractor::default().extract_html("example.com", html, "/steps");

        assert_eq!(extraction.title, "/steps");
        assert_eq!(extraction.markdown, "## Steps\n\n1. one\n2. two\n\nDone");
    }

    #[test]
    fn test_extract_pretty_printed_heading() {
        let extraction = Extractor::default().extract_html(
            "example.com",
            "<html><body><main><h2>Getting\n      started</h2><p>Body</p></main></body></html>",
            "/",
        );
        assert_eq!(extraction.markdown, "## Getting started\n\nBody");
    }

    #[test]
    fn test_extract_with_override_rules() {
        let mut rules = HashMap::new();
        rules.insert(
            "docs.example.com".to_string(),
            RuleConfig {
                title_pattern: Some(r#"<h1 class="t">(.*?)</h1>"#.to_string()),
                content_patterns: vec![r#"<p class="keep">.*?</p>"#.to_string()],
                exclude_patterns: vec![r#" class="keep""#.to_string()],
            },
        );
        let extractor = Extractor::new(PatternRegistry::from_rules(&rules).unwrap());

        let html = r#"<html><body><h1 class="t">Guide</h1><p>drop</p><p class="keep">kept</p></body></html>"#;
        let extraction = extractor.extract_html("docs.example.com", html, "/");
        assert_eq!(extraction.title, "Guide");
        assert_eq!(extraction.markdown, "<p>kept</p>");

        let other = extractor.extract_html("other.example.com", html, "/");
        assert!(other.markdown.contains("drop"));
    }

    #[test]
    fn test_extract_empty_document_uses_fallback() {
        let extraction = Extractor::default().extract_html("example.com", "", "/fallback");
        assert_eq!(extraction.title, "/fallback");
        assert_eq!(extraction.markdown, "");
        assert!(extraction.links.is_empty());
    }
}
