/// Title and description extraction for documentation files.
///
/// - Title: the first non-blank line when it is a level-1 heading (`# Title`),
///   otherwise synthesized from the file name (`first-steps` -> `First Steps`).
/// - Description: the first paragraph of plain text, skipping headings, list
///   items, fence lines and everything inside fences. Bounded to
///   `DESCRIPTION_MAX_CHARS` characters.
///
/// Only the leading `LEADING_LINES` lines are examined.
use std::sync::LazyLock;

use regex::Regex;

pub const LEADING_LINES: usize = 64;
const DESCRIPTION_MAX_CHARS: usize = 160;

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMetadata {
    pub title: String,
    pub description: String,
}

pub fn extract_metadata(content: &str, file_stem: &str) -> DocMetadata {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().take(LEADING_LINES).collect();

    let title = lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| line.trim_start().strip_prefix("# "))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| title_from_name(file_stem));

    DocMetadata {
        title,
        description: first_paragraph(&lines),
    }
}

/// `getting-started` -> `Getting Started`. Underscores count as separators too.
pub fn title_from_name(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn first_paragraph(lines: &[&str]) -> String {
    let mut in_fence = false;
    let mut paragraph: Vec<&str> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            if !paragraph.is_empty() {
                break;
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let plain = !trimmed.is_empty() && !trimmed.starts_with('#') && !LIST_ITEM_RE.is_match(line);
        if plain {
            paragraph.push(trimmed);
        } else if !paragraph.is_empty() {
            break;
        }
    }

    truncate_chars(&paragraph.join(" "), DESCRIPTION_MAX_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].trim_end().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_heading_becomes_title() {
        let meta = extract_metadata("# My Title\n\nSome text.", "my-title");
        assert_eq!(meta.title, "My Title");
        assert_eq!(meta.description, "Some text.");
    }

    #[test]
    fn missing_heading_falls_back_to_file_name() {
        let meta = extract_metadata("Plain intro line.\n", "getting-started_guide");
        assert_eq!(meta.title, "Getting Started Guide");
        assert_eq!(meta.description, "Plain intro line.");
    }

    #[test]
    fn heading_must_be_first_non_blank_line() {
        let meta = extract_metadata("\n\nIntro first.\n\n# Late Heading\n", "late");
        assert_eq!(meta.title, "Late");
        assert_eq!(meta.description, "Intro first.");

        let meta = extract_metadata("## Second Level\n\nBody.", "second-level");
        assert_eq!(meta.title, "Second Level");
    }

    #[test]
    fn description_skips_lists_code_and_headings() {
        let content = "# Install\n\n## Steps\n\n- one\n1. two\n\n```sh\nnot a description\n```\n\nThe real\nparagraph here.\n\nAnother.";
        let meta = extract_metadata(content, "install");
        assert_eq!(meta.description, "The real paragraph here.");
    }

    #[test]
    fn description_is_bounded() {
        let long = "word ".repeat(100);
        let meta = extract_metadata(&format!("# T\n\n{long}"), "t");
        assert!(meta.description.chars().count() <= DESCRIPTION_MAX_CHARS);
        assert!(meta.description.starts_with("word word"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn empty_file_has_empty_description() {
        let meta = extract_metadata("", "faq");
        assert_eq!(meta.title, "Faq");
        assert!(meta.description.is_empty());
    }

    #[test]
    fn byte_order_mark_does_not_hide_heading() {
        let meta = extract_metadata("\u{FEFF}# My Title\n\nSome text.", "my-file");
        assert_eq!(meta.title, "My Title");
        assert_eq!(meta.description, "Some text.");
    }
}
