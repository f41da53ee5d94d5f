/// Minimal markdown-to-blocks renderer for the documentation viewer.
///
/// Content is split on triple-backtick fences. Even-indexed segments are prose,
/// odd-indexed segments are code. Prose is classified line by line:
/// - `#`..`######` followed by a space: heading of that level
/// - `- `: list item (consecutive items share one list)
/// - blank line: paragraph break
/// - anything else: paragraph text
///
/// Tables, images, links, nested lists and blockquotes are not interpreted;
/// their source lines come through as paragraph text.
use serde::{Deserialize, Serialize};

const FENCE: &str = "```";
const MAX_HEADING_LEVEL: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Prose { elements: Vec<ProseElement> },
    Code(CodeBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProseElement {
    Heading { level: u8, text: String },
    List { items: Vec<String> },
    /// Consecutive text lines, joined with `\n`
    Paragraph { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Tag from the opening fence line, e.g. "rust"
    pub language: Option<String>,
    pub lines: Vec<CodeLine>,
}

/// A single copyable line of a code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLine {
    /// 1-based line number within the block
    pub number: usize,
    pub text: String,
}

impl CodeBlock {
    /// The whole block body, as copied by the "copy all" control.
    pub fn copy_all(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render raw markdown into an ordered sequence of blocks.
///
/// Whitespace-only prose segments produce no block. An unterminated fence
/// leaves the remainder of the document as code. A leading byte order mark
/// is dropped.
pub fn render_markdown(content: &str) -> Vec<Block> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    content
        .split(FENCE)
        .enumerate()
        .filter_map(|(index, segment)| {
            if index % 2 == 1 {
                Some(Block::Code(parse_code(segment)))
            } else {
                let elements = parse_prose(segment);
                (!elements.is_empty()).then_some(Block::Prose { elements })
            }
        })
        .collect()
}

fn parse_code(segment: &str) -> CodeBlock {
    let mut lines = segment.lines();
    let language = lines
        .next()
        .and_then(|first| first.split_whitespace().next())
        .map(|tag| tag.to_string());

    let mut body: Vec<&str> = lines.collect();
    while body.last().is_some_and(|line| line.trim().is_empty()) {
        body.pop();
    }

    CodeBlock {
        language,
        lines: body
            .into_iter()
            .enumerate()
            .map(|(i, text)| CodeLine {
                number: i + 1,
                text: text.to_string(),
            })
            .collect(),
    }
}

#[derive(Default)]
struct ProseBuilder {
    elements: Vec<ProseElement>,
    list: Vec<String>,
    paragraph: Vec<String>,
}

impl ProseBuilder {
    fn flush_list(&mut self) {
        if !self.list.is_empty() {
            let items = std::mem::take(&mut self.list);
            self.elements.push(ProseElement::List { items });
        }
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = std::mem::take(&mut self.paragraph).join("\n");
            self.elements.push(ProseElement::Paragraph { text });
        }
    }

    fn flush(&mut self) {
        self.flush_list();
        self.flush_paragraph();
    }

    fn finish(mut self) -> Vec<ProseElement> {
        self.flush();
        self.elements
    }
}

fn parse_prose(segment: &str) -> Vec<ProseElement> {
    let mut builder = ProseBuilder::default();

    for line in segment.lines() {
        let line = line.trim_end();
        if let Some((level, text)) = heading(line) {
            builder.flush();
            builder.elements.push(ProseElement::Heading {
                level,
                text: text.to_string(),
            });
        } else if let Some(item) = line.strip_prefix("- ") {
            builder.flush_paragraph();
            builder.list.push(item.trim().to_string());
        } else if line.trim().is_empty() {
            builder.flush();
        } else {
            builder.flush_list();
            builder.paragraph.push(line.trim().to_string());
        }
    }

    builder.finish()
}

/// Returns `(level, text)` when the line is an ATX heading of level 1-6.
fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    Some((level as u8, text.trim()))
}
