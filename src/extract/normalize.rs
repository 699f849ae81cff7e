//! Markdown cleanup
//!
//! Each pass works line by line and leaves fenced code untouched. Running
//! [`normalize`] on its own output returns the same text.

use regex::Regex;
use std::sync::LazyLock;

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s").expect("BUG: heading line pattern is invalid"));

static LIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-|\d+\.)\s").expect("BUG: list line pattern is invalid"));

/// Runs every cleanup pass and trims the result
pub fn normalize(text: &str) -> String {
    let text = isolate_fences(text);
    let text = collapse_blank_lines(&text);
    let text = space_headings(&text);
    let text = tighten_list_spacing(&text);
    text.trim().to_string()
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Tracks whether the current line sits inside a fenced block
#[derive(Default)]
struct FenceState {
    inside: bool,
}

impl FenceState {
    /// Returns true when `line` is code (fence markers included)
    fn observe(&mut self, line: &str) -> bool {
        if is_fence(line) {
            self.inside = !self.inside;
            return true;
        }
        self.inside
    }
}

/// Puts fences on their own lines surrounded by blank lines
///
/// Lines outside fences are trimmed and runs of blank lines are folded
/// while lines inside fences are kept verbatim.
pub fn isolate_fences(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut inside = false;

    for line in text.lines() {
        let trimmed = line.trim();
        let last_is_text = out.last().is_some_and(|l| !l.is_empty());

        if is_fence(trimmed) {
            if inside {
                out.push(trimmed);
                out.push("");
            } else {
                if last_is_text {
                    out.push("");
                }
                out.push(trimmed);
            }
            inside = !inside;
        } else if inside {
            out.push(line);
        } else if !trimmed.is_empty() || last_is_text {
            out.push(trimmed);
        }
    }

    out.join("\n")
}

/// Folds runs of blank lines outside fences into one
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fences = FenceState::default();

    for line in text.lines() {
        let code = fences.observe(line);
        let blank = line.trim().is_empty();
        if !code && blank && out.last().is_some_and(|l| l.trim().is_empty()) {
            continue;
        }
        out.push(if !code && blank { "" } else { line });
    }

    out.join("\n")
}

/// Ensures a blank line before and after every heading
pub fn space_headings(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fences = FenceState::default();
    let mut blank_after = false;

    for line in text.lines() {
        let code = fences.observe(line);
        let blank = line.trim().is_empty();

        if blank_after && !blank {
            out.push("");
        }
        blank_after = false;

        if !code && HEADING_LINE.is_match(line) {
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push("");
            }
            blank_after = true;
        }
        out.push(line);
    }

    out.join("\n")
}

/// Reduces runs of blank lines in front of a list item to one
pub fn tighten_list_spacing(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fences = FenceState::default();
    let mut pending_blanks = 0usize;

    for line in text.lines() {
        let code = fences.observe(line);
        if !code && line.trim().is_empty() {
            pending_blanks += 1;
            continue;
        }

        let keep = if !code && LIST_LINE.is_match(line) {
            pending_blanks.min(1)
        } else {
            pending_blanks
        };
        out.extend(std::iter::repeat("").take(keep));
        pending_blanks = 0;
        out.push(line);
    }
    out.extend(std::iter::repeat("").take(pending_blanks));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rendered_page() {
        let raw = "\n# T\n\nHi\n\n\n```py\nx=1\n```\n\n\n## Links\n\n[link](/x)\n";
        assert_eq!(
            normalize(raw),
            "# T\n\nHi\n\n```py\nx=1\n```\n\n## Links\n\n[link](/x)"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = "  intro  \n## Heading\ntext\n\n\n\n- a\n- b\n```rust\nfn x() {\n\n\n    y();\n}\n```\nafter\n### Sub\n1. one\n2. two";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_fence_body_kept_verbatim() {
        let raw = "text\n```\n    indented\n\n\n\nstill code\n```\nmore";
        assert_eq!(
            normalize(raw),
            "text\n\n```\n    indented\n\n\n\nstill code\n```\n\nmore"
        );
    }

    #[test]
    fn test_hash_inside_code_is_not_a_heading() {
        let raw = "```sh\n# comment\n```";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_heading_levels_preserved() {
        let raw = "para\n## Second\n### Third\nbody";
        assert_eq!(normalize(raw), "para\n\n## Second\n\n### Third\n\nbody");
    }

    #[test]
    fn test_hash_without_space_is_text() {
        assert_eq!(normalize("C# rocks\n#hashtag"), "C# rocks\n#hashtag");
    }

    #[test]
    fn test_ordered_list_untouched() {
        let raw = "1. one\n2. two\n3. three";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_blank_lines_collapsed_outside_fences() {
        assert_eq!(collapse_blank_lines("a\n\n \n\nb"), "a\n\nb");
    }

    #[test]
    fn test_tighten_list_spacing() {
        assert_eq!(tighten_list_spacing("a\n\n\n- b\n\n\nc"), "a\n\n- b\n\n\nc");
    }

    #[test]
    fn test_unclosed_fence() {
        let raw = "intro\n```\ncode\n\n\n";
        assert_eq!(normalize(raw), "intro\n\n```\ncode");
        assert_eq!(normalize(&normalize(raw)), normalize(raw));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n  \n"), "");
    }
}
