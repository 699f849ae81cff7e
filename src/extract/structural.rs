//! Structural extraction
//!
//! Resolves a page title and turns the main content of a parsed document
//! into an ordered list of Markdown [`Block`]s. When a source has content
//! override patterns, the regex matches replace the DOM walk entirely.

use crate::extract::code::{detect_language, CodeRegion};
use crate::extract::rules::ExtractionRuleSet;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static WALK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, ul, ol, li, pre, code, blockquote, a")
        .expect("BUG: hardcoded walk selector is invalid")
});

/// Navigation landmarks; nothing underneath them is extracted
static LANDMARK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("nav, .nav, .navigation, .menu, .sidebar, aside")
        .expect("BUG: hardcoded landmark selector is invalid")
});

static SEMANTIC_ROOTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article, [role='main'], main, .main-content, #main-content")
        .expect("BUG: hardcoded semantic root selector is invalid")
});

static GENERIC_ROOTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".content, #content, .post, #post")
        .expect("BUG: hardcoded generic root selector is invalid")
});

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("BUG: 'body' selector is invalid"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("BUG: 'title' selector is invalid"));

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("BUG: 'h1' selector is invalid"));

static CODE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("BUG: 'code' selector is invalid"));

static PRE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("BUG: 'pre' selector is invalid"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("BUG: 'a[href]' selector is invalid"));

/// Heading of the section that lists the links found on a page
pub const LINKS_HEADING: &str = "Links";

/// One unit of extracted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: usize, text: String },
    Paragraph(String),
    UnorderedItem(String),
    /// `number` restarts at 1 for every list
    OrderedItem { number: usize, text: String },
    Code(CodeRegion),
    InlineCode(String),
    Blockquote(String),
    Link { text: String, href: String },
}

impl Block {
    fn is_list_item(&self) -> bool {
        matches!(self, Self::UnorderedItem(_) | Self::OrderedItem { .. })
    }
}

/// Link text to href, in order of first appearance
///
/// Inserting a text that is already present replaces its href, so the last
/// occurrence of a link text wins while the position of the first is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl LinkSet {
    pub fn insert(&mut self, text: String, href: String) {
        match self.index.get(&text) {
            Some(&i) => self.entries[i].1 = href,
            None => {
                self.index.insert(text.clone(), self.entries.len());
                self.entries.push((text, href));
            }
        }
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.index.get(text).map(|&i| self.entries[i].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, h)| (t.as_str(), h.as_str()))
    }

    pub fn hrefs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, h)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracted page body before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Result of the structural walk, links section included
    Blocks(Vec<Block>),
    /// Concatenated override matches with exclusions removed
    Override(String),
}

/// Output of [`extract`]
#[derive(Debug, Clone)]
pub struct StructuredDocument {
    pub title: String,
    pub body: Body,
    pub links: LinkSet,
}

/// Extracts title, body and links from a parsed document
///
/// `rules` is the override rule set of the document's source, if any.
/// `fallback_title` is used when no title can be found in the document.
pub fn extract(
    rules: Option<&ExtractionRuleSet>,
    document: &Html,
    fallback_title: &str,
) -> StructuredDocument {
    let markup = document.html();
    let title = resolve_title(rules, document, &markup, fallback_title);

    if let Some(rules) = rules.filter(|r| r.overrides_content()) {
        return StructuredDocument {
            title,
            body: Body::Override(apply_override(rules, &markup)),
            links: collect_links(document.root_element()),
        };
    }

    let (mut blocks, links) = walk(content_root(document));
    if !links.is_empty() {
        blocks.push(Block::Heading {
            level: 2,
            text: LINKS_HEADING.to_string(),
        });
        blocks.extend(links.iter().map(|(text, href)| Block::Link {
            text: text.to_string(),
            href: href.to_string(),
        }));
    }

    StructuredDocument {
        title,
        body: Body::Blocks(blocks),
        links,
    }
}

/// Resolves the page title
///
/// Order: the first capture of the source's title pattern against the
/// document markup, the `<title>` text, the first `<h1>` text, and finally
/// `fallback_title`.
pub fn resolve_title(
    rules: Option<&ExtractionRuleSet>,
    document: &Html,
    markup: &str,
    fallback_title: &str,
) -> String {
    let from_pattern = rules
        .and_then(|r| r.title_pattern())
        .and_then(|re| re.captures(markup))
        .and_then(|caps| caps.get(1))
        .map(|m| collapse_whitespace(m.as_str()))
        .filter(|t| !t.is_empty());
    if let Some(title) = from_pattern {
        return title;
    }

    [&*TITLE_SELECTOR, &*H1_SELECTOR]
        .into_iter()
        .find_map(|selector| {
            document
                .select(selector)
                .next()
                .map(|el| inline_text(&el))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| fallback_title.to_string())
}

/// Applies content and exclude patterns to the document markup
///
/// Every match of every content pattern is kept, pattern by pattern, each
/// followed by a newline; exclude matches are then removed from the result.
pub fn apply_override(rules: &ExtractionRuleSet, markup: &str) -> String {
    let mut content = String::new();
    for pattern in rules.content_patterns() {
        for found in pattern.find_iter(markup) {
            content.push_str(found.as_str());
            content.push('\n');
        }
    }

    for pattern in rules.exclude_patterns() {
        content = pattern.replace_all(&content, "").into_owned();
    }

    content
}

/// Picks the element the structural walk starts from
fn content_root(document: &Html) -> ElementRef<'_> {
    for selector in [&*SEMANTIC_ROOTS, &*GENERIC_ROOTS] {
        if let Some(root) = document.select(selector).find(has_text) {
            return root;
        }
    }

    document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element())
}

/// Walks `root` in document order and emits blocks and links
pub fn walk(root: ElementRef<'_>) -> (Vec<Block>, LinkSet) {
    let mut blocks = Vec::new();
    let mut links = LinkSet::default();
    let mut seen_headings: HashSet<String> = HashSet::new();

    for element in root.select(&WALK_SELECTOR) {
        if in_landmark(&element) {
            continue;
        }

        match element.value().name() {
            name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let text = inline_text(&element);
                if text.is_empty() || !seen_headings.insert(text.clone()) {
                    continue;
                }
                let level = name[1..].parse().unwrap_or(1);
                blocks.push(Block::Heading { level, text });
            }
            "p" => {
                if has_ancestor(&element, &PRE_SELECTOR) {
                    continue;
                }
                let text = element_text(&element);
                if !text.is_empty() {
                    blocks.push(Block::Paragraph(text));
                }
            }
            "ul" => {
                blocks.extend(list_items(&element).map(Block::UnorderedItem));
            }
            "ol" => {
                blocks.extend(
                    list_items(&element)
                        .enumerate()
                        .map(|(i, text)| Block::OrderedItem { number: i + 1, text }),
                );
            }
            "pre" => {
                blocks.extend(code_regions(&element).into_iter().map(Block::Code));
            }
            "code" => {
                if has_ancestor(&element, &PRE_SELECTOR)
                    || element.select(&PRE_SELECTOR).next().is_some()
                {
                    continue;
                }
                let text = element_text(&element);
                if !text.is_empty() {
                    blocks.push(Block::InlineCode(text));
                }
            }
            "blockquote" => {
                let text = element_text(&element);
                if !text.is_empty() {
                    blocks.push(Block::Blockquote(text));
                }
            }
            "a" => {
                if let Some((text, href)) = link_pair(&element) {
                    links.insert(text, href);
                }
            }
            // list items are emitted by their list
            _ => {}
        }
    }

    (blocks, links)
}

/// Collects every link of the document, landmarks included
fn collect_links(root: ElementRef<'_>) -> LinkSet {
    let mut links = LinkSet::default();
    for anchor in root.select(&ANCHOR_SELECTOR) {
        if let Some((text, href)) = link_pair(&anchor) {
            links.insert(text, href);
        }
    }
    links
}

fn link_pair(anchor: &ElementRef<'_>) -> Option<(String, String)> {
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let text = element_text(anchor);
    if text.is_empty() {
        return None;
    }
    Some((text, href.to_string()))
}

/// Code regions of a `pre` element
///
/// A nested `code` element's own language wins over the one on `pre`.
fn code_regions(pre: &ElementRef<'_>) -> Vec<CodeRegion> {
    let pre_language = detect_language(pre);
    let codes: Vec<ElementRef<'_>> = pre.select(&CODE_SELECTOR).collect();

    if codes.is_empty() {
        let raw: String = pre.text().collect();
        return CodeRegion::new(pre_language, &raw).into_iter().collect();
    }

    codes
        .iter()
        .filter_map(|code| {
            let language = match detect_language(code) {
                detected if detected.is_empty() => pre_language.clone(),
                detected => detected,
            };
            let raw: String = code.text().collect();
            CodeRegion::new(language, &raw)
        })
        .collect()
}

/// Non-empty texts of a list's own items, nested lists excluded
fn list_items<'a>(list: &ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(|li| {
            let mut text = String::new();
            push_text_skipping_lists(&li, &mut text);
            collapse_whitespace(&text)
        })
        .filter(|text| !text.is_empty())
}

fn push_text_skipping_lists(element: &ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "ul" || el.name() == "ol" => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_text_skipping_lists(&child, out);
                }
            }
            _ => {}
        }
    }
}

fn in_landmark(element: &ElementRef<'_>) -> bool {
    has_ancestor(element, &LANDMARK_SELECTOR)
}

fn has_ancestor(element: &ElementRef<'_>, selector: &Selector) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

fn has_text(element: &ElementRef<'_>) -> bool {
    element.text().any(|t| !t.trim().is_empty())
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Element text on a single line, whitespace runs folded to one space
fn inline_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders blocks as Markdown text for the normalizer
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut previous_was_item = false;

    for block in blocks {
        let is_item = block.is_list_item();
        let starts_new_list = matches!(block, Block::OrderedItem { number: 1, .. });
        if previous_was_item != is_item || (is_item && starts_new_list) {
            out.push('\n');
        }
        previous_was_item = is_item;

        match block {
            Block::Heading { level, text } => {
                out.push('\n');
                out.push_str(&"#".repeat(*level));
                out.push(' ');
                out.push_str(text);
                out.push_str("\n\n");
            }
            Block::Paragraph(text) => {
                out.push_str(text);
                out.push_str("\n\n");
            }
            Block::UnorderedItem(text) => {
                out.push_str("- ");
                out.push_str(text);
                out.push('\n');
            }
            Block::OrderedItem { number, text } => {
                out.push_str(&format!("{}. {}\n", number, text));
            }
            Block::Code(region) => {
                out.push('\n');
                out.push_str(&region.to_fenced());
                out.push_str("\n\n");
            }
            Block::InlineCode(text) => {
                out.push('`');
                out.push_str(text);
                out.push_str("`\n");
            }
            Block::Blockquote(text) => {
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    out.push_str("> ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push('\n');
            }
            Block::Link { text, href } => {
                out.push_str(&format!("[{}]({})\n", text, href));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    fn blocks_of(html: &str) -> Vec<Block> {
        let doc = Html::parse_document(html);
        match extract(None, &doc, "fallback").body {
            Body::Blocks(blocks) => blocks,
            Body::Override(_) => panic!("unexpected override"),
        }
    }

    fn rules(title: Option<&str>, content: &[&str], exclude: &[&str]) -> ExtractionRuleSet {
        let config = RuleConfig {
            title_pattern: title.map(str::to_string),
            content_patterns: content.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: exclude.iter().map(|s| s.to_string()).collect(),
        };
        ExtractionRuleSet::compile("test.com", &config).unwrap()
    }

    #[test]
    fn test_title_from_title_element() {
        let doc = Html::parse_document("<html><head><title> Page </title></head><body><h1>H</h1></body></html>");
        let extracted = extract(None, &doc, "/path");
        assert_eq!(extracted.title, "Page");
    }

    #[test]
    fn test_title_falls_back_to_h1_then_fallback() {
        let doc = Html::parse_document("<html><body><h1>Heading</h1><h1>Second</h1></body></html>");
        assert_eq!(extract(None, &doc, "/path").title, "Heading");

        let doc = Html::parse_document("<html><body><p>text</p></body></html>");
        assert_eq!(extract(None, &doc, "/path").title, "/path");
    }

    #[test]
    fn test_title_from_rule_pattern() {
        let doc = Html::parse_document(
            r#"<html><head><title>Generic</title></head><body><div class="doc-title">Real Title</div></body></html>"#,
        );
        let rules = rules(Some(r#"<div class="doc-title">(.*?)</div>"#), &[], &[]);
        assert_eq!(extract(Some(&rules), &doc, "/").title, "Real Title");
    }

    #[test]
    fn test_title_pattern_sees_html_element() {
        let doc = Html::parse_document(
            r#"<html lang="en-GB"><head><title>Generic</title></head><body></body></html>"#,
        );
        let rules = rules(Some(r#"<html lang="([^"]+)">"#), &[], &[]);
        assert_eq!(extract(Some(&rules), &doc, "/").title, "en-GB");
    }

    #[test]
    fn test_multiline_titles_fold_to_one_line() {
        let doc = Html::parse_document(
            "<html><head><title>\n    Release\n    Notes\n  </title></head><body></body></html>",
        );
        assert_eq!(extract(None, &doc, "/").title, "Release Notes");

        let doc = Html::parse_document("<html><body><h1>Release\n\t Notes</h1></body></html>");
        assert_eq!(extract(None, &doc, "/").title, "Release Notes");

        let doc = Html::parse_document(
            "<html><body><div class=\"t\">Release\n   Notes</div></body></html>",
        );
        let rules = rules(Some(r#"(?s)<div class="t">(.*?)</div>"#), &[], &[]);
        assert_eq!(extract(Some(&rules), &doc, "/").title, "Release Notes");
    }

    #[test]
    fn test_title_pattern_without_match_falls_through() {
        let doc = Html::parse_document("<html><head><title>Generic</title></head><body></body></html>");
        let rules = rules(Some("<h9>(.*)</h9>"), &[], &[]);
        assert_eq!(extract(Some(&rules), &doc, "/").title, "Generic");
    }

    #[test]
    fn test_override_concatenates_matches_and_excludes() {
        let doc = Html::parse_document(
            r#"<html><body>
            <div class="a">one<script>x()</script></div>
            <div class="b">two</div>
            <div class="a">three</div>
            </body></html>"#,
        );
        let rules = rules(
            None,
            &[r#"<div class="a">.*?</div>"#, r#"<div class="b">.*?</div>"#],
            &[r"<script>.*?</script>"],
        );

        let extracted = extract(Some(&rules), &doc, "/");
        assert_eq!(
            extracted.body,
            Body::Override(
                "<div class=\"a\">one</div>\n<div class=\"a\">three</div>\n<div class=\"b\">two</div>\n"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_override_still_reports_links() {
        let doc = Html::parse_document(
            r#"<html><body><nav><a href="/nav">Nav</a></nav><p>x</p></body></html>"#,
        );
        let rules = rules(None, &["<p>.*?</p>"], &[]);
        let extracted = extract(Some(&rules), &doc, "/");
        assert_eq!(extracted.links.get("Nav"), Some("/nav"));
    }

    #[test]
    fn test_duplicate_headings_emitted_once() {
        let blocks = blocks_of(
            "<html><body><h2>Intro</h2><p>a</p><h3>Intro</h3><h2> Next </h2></body></html>",
        );
        let headings: Vec<&Block> = blocks
            .iter()
            .filter(|b| matches!(b, Block::Heading { .. }))
            .collect();
        assert_eq!(
            headings,
            vec![
                &Block::Heading { level: 2, text: "Intro".to_string() },
                &Block::Heading { level: 2, text: "Next".to_string() },
            ]
        );
    }

    #[test]
    fn test_multiline_headings_fold_and_dedup() {
        let blocks = blocks_of(
            "<html><body><main><h2>Getting\n      started</h2><p>Body</p><h3>Getting started</h3></main></body></html>",
        );
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 2, text: "Getting started".to_string() },
                Block::Paragraph("Body".to_string()),
            ]
        );
    }

    #[test]
    fn test_navigation_is_skipped() {
        let blocks = blocks_of(
            r#"<html><body>
            <nav><h2>Menu</h2><p>nav text</p></nav>
            <div class="sidebar"><p>side</p></div>
            <aside><p>aside</p></aside>
            <div class="menu"><ul><li>m</li></ul></div>
            <p>kept</p>
            </body></html>"#,
        );
        assert_eq!(blocks, vec![Block::Paragraph("kept".to_string())]);
    }

    #[test]
    fn test_prefers_semantic_root() {
        let blocks = blocks_of(
            r#"<html><body><p>outside</p><main><p>inside</p></main></body></html>"#,
        );
        assert_eq!(blocks, vec![Block::Paragraph("inside".to_string())]);
    }

    #[test]
    fn test_empty_semantic_root_is_skipped() {
        let blocks = blocks_of(
            r#"<html><body><article> </article><div id="content"><p>generic</p></div><p>body</p></body></html>"#,
        );
        assert_eq!(blocks, vec![Block::Paragraph("generic".to_string())]);
    }

    #[test]
    fn test_lists() {
        let blocks = blocks_of(
            "<html><body><ul><li>a</li><li> </li><li>b</li></ul><ol><li>x</li><li>y</li></ol><ol><li>z</li></ol></body></html>",
        );
        assert_eq!(
            blocks,
            vec![
                Block::UnorderedItem("a".to_string()),
                Block::UnorderedItem("b".to_string()),
                Block::OrderedItem { number: 1, text: "x".to_string() },
                Block::OrderedItem { number: 2, text: "y".to_string() },
                Block::OrderedItem { number: 1, text: "z".to_string() },
            ]
        );
    }

    #[test]
    fn test_nested_list_items_not_duplicated() {
        let blocks = blocks_of(
            "<html><body><ul><li>outer<ul><li>inner</li></ul></li></ul></body></html>",
        );
        assert_eq!(
            blocks,
            vec![
                Block::UnorderedItem("outer".to_string()),
                Block::UnorderedItem("inner".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_language_from_nested_code_wins() {
        let blocks = blocks_of(
            r#"<html><body><pre class="language-text"><code class="language-rust">fn main() {}</code></pre></body></html>"#,
        );
        assert_eq!(
            blocks,
            vec![Block::Code(CodeRegion {
                language: "rust".to_string(),
                body: "fn main() {}".to_string(),
            })]
        );
    }

    #[test]
    fn test_pre_language_used_when_code_has_none() {
        let blocks = blocks_of(
            r#"<html><body><pre class="lang-sh"><code>ls</code></pre></body></html>"#,
        );
        assert_eq!(
            blocks,
            vec![Block::Code(CodeRegion {
                language: "sh".to_string(),
                body: "ls".to_string(),
            })]
        );
    }

    #[test]
    fn test_bare_pre_is_code() {
        let blocks = blocks_of("<html><body><pre>  a\n    b</pre></body></html>");
        assert_eq!(
            blocks,
            vec![Block::Code(CodeRegion {
                language: String::new(),
                body: "a\n  b".to_string(),
            })]
        );
    }

    #[test]
    fn test_inline_code_outside_pre() {
        let blocks = blocks_of("<html><body><div><code>cargo build</code></div></body></html>");
        assert_eq!(blocks, vec![Block::InlineCode("cargo build".to_string())]);
    }

    #[test]
    fn test_blockquote() {
        let blocks = blocks_of("<html><body><blockquote> quoted </blockquote></body></html>");
        assert_eq!(blocks, vec![Block::Blockquote("quoted".to_string())]);
    }

    #[test]
    fn test_links_last_text_wins_and_section_appended() {
        let blocks = blocks_of(
            r##"<html><body>
            <a href="/first">Docs</a>
            <a href="#top">Top</a>
            <a href="">Empty</a>
            <a href="/x"> </a>
            <a href="/other">Other</a>
            <a href="/second">Docs</a>
            </body></html>"##,
        );
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 2, text: "Links".to_string() },
                Block::Link { text: "Docs".to_string(), href: "/second".to_string() },
                Block::Link { text: "Other".to_string(), href: "/other".to_string() },
            ]
        );
    }

    #[test]
    fn test_link_set_overwrite_keeps_position() {
        let mut links = LinkSet::default();
        links.insert("a".to_string(), "/1".to_string());
        links.insert("b".to_string(), "/2".to_string());
        links.insert("a".to_string(), "/3".to_string());

        let pairs: Vec<(&str, &str)> = links.iter().collect();
        assert_eq!(pairs, vec![("a", "/3"), ("b", "/2")]);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_render_blocks() {
        let blocks = vec![
            Block::Heading { level: 2, text: "Title".to_string() },
            Block::Paragraph("Text".to_string()),
            Block::UnorderedItem("a".to_string()),
            Block::Paragraph("After".to_string()),
            Block::Blockquote("q1\n  q2".to_string()),
            Block::Link { text: "l".to_string(), href: "/l".to_string() },
        ];
        assert_eq!(
            render_blocks(&blocks),
            "\n## Title\n\nText\n\n\n- a\n\nAfter\n\n> q1\n> q2\n\n[l](/l)\n"
        );
    }
}
