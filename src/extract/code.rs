//! Code block analysis
//!
//! Detects the language label of a `pre`/`code` region from its attributes
//! and strips the indentation shared by every line of its text.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Attributes inspected for a language hint, in order
const LANGUAGE_ATTRIBUTES: [&str; 3] = ["class", "data-lang", "data-language"];

static LANGUAGE_HINTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"language-([\w+-]+)",
        r"lang-([\w+-]+)",
        r"brush:\s*([\w+-]+)",
        r"highlight-([\w+-]+)",
        r"([\w+-]+)-highlight",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("BUG: hardcoded language hint pattern is invalid"))
    .collect()
});

/// A code region ready to be rendered as a fenced block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRegion {
    /// Detected language label, empty when unknown
    pub language: String,
    /// Body with common indentation removed
    pub body: String,
}

impl CodeRegion {
    /// Builds a region from a raw text node
    ///
    /// Blank lines surrounding the code are dropped before the indentation
    /// is normalized. Returns `None` when nothing but whitespace remains.
    pub fn new(language: String, raw: &str) -> Option<Self> {
        let trimmed = trim_blank_lines(raw);
        if trimmed.trim().is_empty() {
            return None;
        }
        Some(Self {
            language,
            body: normalize_indentation(&trimmed),
        })
    }

    /// Renders the region as a fenced Markdown block
    pub fn to_fenced(&self) -> String {
        format!("```{}\n{}\n```", self.language, self.body)
    }
}

/// Detects the language label of a code element
///
/// Looks at `class`, `data-lang` and `data-language` in that order and
/// returns the first capture of the first hint pattern that matches, e.g.
/// `class="language-go highlight"` yields `"go"`. Returns an empty string
/// when no attribute carries a hint.
pub fn detect_language(element: &ElementRef) -> String {
    let value = element.value();
    LANGUAGE_ATTRIBUTES
        .iter()
        .filter_map(|attr| value.attr(attr))
        .find_map(language_hint)
        .unwrap_or_default()
}

/// Language hint from a single attribute value
pub fn language_hint(value: &str) -> Option<String> {
    LANGUAGE_HINTS
        .iter()
        .find_map(|re| re.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Removes the indentation shared by all non-blank lines
///
/// Relative indentation is preserved. Blank lines shorter than the common
/// indent lose whatever whitespace they have. Single-line input is returned
/// unchanged.
pub fn normalize_indentation(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= 1 {
        return text.to_string();
    }

    let min_indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    if min_indent == 0 {
        return text.to_string();
    }

    lines
        .iter()
        .map(|line| strip_indent(line, min_indent))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|&c| is_indent_char(c)).count()
}

fn strip_indent(line: &str, width: usize) -> &str {
    let cut = line
        .char_indices()
        .take(width)
        .take_while(|&(_, c)| is_indent_char(c))
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &line[cut..]
}

/// Drops whitespace-only lines at the start and end of a code body
fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}
