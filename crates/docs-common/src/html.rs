/// HTML fragment writer for rendered markdown blocks.
///
/// All text is escaped. Each code block carries a "copy all" button and each
/// code line its own copy button; the text to copy lives in `data-copy`.
///
/// The fragment carries no script. The host page installs one delegated click
/// handler for `button.copy-all` and `button.copy-line` that passes
/// `button.dataset.copy` to `navigator.clipboard.writeText`. The attribute
/// value is entity-escaped here and the browser decodes it back to the exact
/// source text.
use crate::markdown::{Block, CodeBlock, ProseElement};

pub fn render_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Prose { elements } => write_prose(&mut out, elements),
            Block::Code(code) => write_code(&mut out, code),
        }
    }
    out
}

fn write_prose(out: &mut String, elements: &[ProseElement]) {
    out.push_str("<div class=\"doc-prose\">");
    for element in elements {
        match element {
            ProseElement::Heading { level, text } => {
                out.push_str(&format!("<h{level}>{}</h{level}>", escape(text)));
            }
            ProseElement::List { items } => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str(&format!("<li>{}</li>", escape(item)));
                }
                out.push_str("</ul>");
            }
            ProseElement::Paragraph { text } => {
                out.push_str(&format!("<p>{}</p>", escape(text)));
            }
        }
    }
    out.push_str("</div>");
}

fn write_code(out: &mut String, code: &CodeBlock) {
    match &code.language {
        Some(language) => out.push_str(&format!(
            "<div class=\"doc-code\" data-language=\"{}\">",
            escape(language)
        )),
        None => out.push_str("<div class=\"doc-code\">"),
    }
    out.push_str(&format!(
        "<button class=\"copy-all\" data-copy=\"{}\">Copy all</button>",
        escape(&code.copy_all())
    ));
    out.push_str("<pre><code>");
    for line in &code.lines {
        let text = escape(&line.text);
        out.push_str(&format!(
            "<span class=\"code-line\" data-line=\"{}\"><span class=\"line-text\">{text}</span>\
             <button class=\"copy-line\" data-copy=\"{text}\">Copy</button></span>\n",
            line.number
        ));
    }
    out.push_str("</code></pre></div>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::render_markdown;

    #[test]
    fn list_items_are_wrapped_in_one_list() {
        let html = render_html(&render_markdown("- a\n- b"));
        assert_eq!(
            html,
            "<div class=\"doc-prose\"><ul><li>a</li><li>b</li></ul></div>"
        );
    }

    #[test]
    fn code_lines_carry_escaped_copy_text() {
        let html = render_html(&render_markdown("```html\n<b>\"x\"</b>\n```"));
        assert!(html.contains("data-language=\"html\""));
        assert!(html.contains("data-copy=\"&lt;b&gt;&quot;x&quot;&lt;/b&gt;\">Copy all"));
        assert!(html.contains("class=\"copy-line\" data-copy=\"&lt;b&gt;&quot;x&quot;&lt;/b&gt;\""));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn headings_keep_their_level() {
        let html = render_html(&render_markdown("## Setup & Install"));
        assert_eq!(html, "<div class=\"doc-prose\"><h2>Setup &amp; Install</h2></div>");
    }
}
