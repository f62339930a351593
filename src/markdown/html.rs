use maud::{html, PreEscaped};

use super::{
    ast::{Block, Document, Inline},
    highlight::Highlighter,
};

/// Appends the HTML of `doc` to `out`. The whole document is one outer
/// paragraph; blank lines become `</p><p>` and single newlines `<br>`.
/// Blocks that shared a source line are written back to back.
pub(super) fn push_html(out: &mut String, doc: &Document, highlighter: &dyn Highlighter) {
    out.push_str("<p>");
    for (i, paragraph) in doc.paragraphs.iter().enumerate() {
        if i > 0 {
            out.push_str("</p><p>");
        }

        let mut in_list = false;
        for (j, block) in paragraph.iter().enumerate() {
            match block {
                Block::Break => {
                    // items of one list are not separated by line breaks
                    let next_is_item = matches!(paragraph.get(j + 1), Some(Block::ListItem(_)));
                    if in_list && next_is_item {
                        continue;
                    }
                    if in_list {
                        out.push_str("</ul>");
                        in_list = false;
                    }
                    out.push_str("<br>");
                }
                Block::ListItem(_) => {
                    if !in_list {
                        out.push_str("<ul>");
                        in_list = true;
                    }
                    push_block(out, block, highlighter);
                }
                _ => {
                    if in_list {
                        out.push_str("</ul>");
                        in_list = false;
                    }
                    push_block(out, block, highlighter);
                }
            }
        }
        if in_list {
            out.push_str("</ul>");
        }
    }
    out.push_str("</p>");
}

fn push_block(out: &mut String, block: &Block, highlighter: &dyn Highlighter) {
    match block {
        Block::Code { language, code } => {
            let highlighted = highlighter.try_highlight(language.as_deref(), code);
            out.push_str(&highlighted.unwrap_or_else(|| escape_code(code)));
        }
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            push_inlines(out, content);
            out.push_str(&format!("</h{level}>"));
        }
        Block::Quote(content) => {
            out.push_str("<blockquote>");
            push_inlines(out, content);
            out.push_str("</blockquote>");
        }
        Block::ListItem(content) => {
            out.push_str("<li>");
            push_inlines(out, content);
            out.push_str("</li>");
        }
        Block::Line(content) => push_inlines(out, content),
        Block::Break => out.push_str("<br>"),
    }
}

/// The plain rendering of a code block: escaped, surrounding whitespace
/// trimmed.
fn escape_code(code: &str) -> String {
    html! {
        pre { code { (code.trim()) } }
    }
    .into_string()
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(code);
                out.push_str("</code>");
            }
            Inline::Image { alt, url } => {
                out.push_str(&html! { img src=(url) alt=(alt); }.into_string());
            }
            Inline::Link { content, url } => {
                let mut label = String::new();
                push_inlines(&mut label, content);
                out.push_str(&html! { a href=(url) { (PreEscaped(label)) } }.into_string());
            }
            Inline::Strong(content) => {
                out.push_str("<strong>");
                push_inlines(out, content);
                out.push_str("</strong>");
            }
            Inline::Emphasis(content) => {
                out.push_str("<em>");
                push_inlines(out, content);
                out.push_str("</em>");
            }
        }
    }
}
