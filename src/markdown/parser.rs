use std::sync::LazyLock;

use regex::Regex;

use super::ast::{Block, Document, Inline, Paragraph};

// a fence closes at the first backtick triple after its opening line
static FENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(\w+)?\n(.*?)```").expect("fence pattern is valid")
});

pub(super) fn parse(text: &str) -> Document {
    let mut builder = DocumentBuilder::default();

    let mut last = 0;
    for caps in FENCE_PATTERN.captures_iter(text) {
        let Some(fence) = caps.get(0) else {
            continue;
        };
        builder.push_prose(&text[last..fence.start()], last == 0);
        builder.push_block(Block::Code {
            language: caps.get(1).map(|m| m.as_str().to_string()),
            code: caps[2].to_string(),
        });
        last = fence.end();
    }
    builder.push_prose(&text[last..], last == 0);

    builder.finish()
}

#[derive(Default)]
struct DocumentBuilder {
    paragraphs: Vec<Paragraph>,
    current: Paragraph,
    // a single newline seen since the last block
    pending_break: bool,
}

impl DocumentBuilder {
    fn push_block(&mut self, block: Block) {
        if std::mem::take(&mut self.pending_break) && !self.current.is_empty() {
            self.current.push(Block::Break);
        }
        self.current.push(block);
    }

    fn break_paragraph(&mut self) {
        self.pending_break = false;
        if !self.current.is_empty() {
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
    }

    /// Splits prose into lines; two or more consecutive newlines end the
    /// current paragraph. Unless `at_line_start`, the first line continues
    /// the line of a preceding fence and is read as plain inline text.
    fn push_prose(&mut self, prose: &str, at_line_start: bool) {
        let mut rest = prose;
        let mut line_start = at_line_start;
        loop {
            let line_end = rest.find('\n').unwrap_or(rest.len());
            let line = &rest[..line_end];
            if !line.is_empty() {
                let block = if line_start {
                    parse_line(line)
                } else {
                    Block::Line(parse_inlines(line))
                };
                self.push_block(block);
            }

            rest = &rest[line_end..];
            let newlines = rest.len() - rest.trim_start_matches('\n').len();
            if newlines == 0 {
                break;
            }
            if newlines >= 2 {
                self.break_paragraph();
            } else {
                self.pending_break = true;
            }
            line_start = true;
            rest = &rest[newlines..];
        }
    }

    fn finish(mut self) -> Document {
        self.break_paragraph();
        Document {
            paragraphs: self.paragraphs,
        }
    }
}

fn parse_line(line: &str) -> Block {
    if let Some(block) = parse_heading(line) {
        return block;
    }
    if let Some(quoted) = line.strip_prefix("> ").filter(|s| !s.is_empty()) {
        return Block::Quote(parse_inlines(quoted));
    }
    if let Some(item) = line.strip_prefix("* ").filter(|s| !s.is_empty()) {
        return Block::ListItem(parse_inlines(item));
    }
    Block::Line(parse_inlines(line))
}

fn parse_heading(line: &str) -> Option<Block> {
    let level = line.len() - line.trim_start_matches('#').len();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(Block::Heading {
        level: level as u8,
        content: parse_inlines(text),
    })
}

pub(super) fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut plain = String::new();

    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if let Some((inline, consumed)) = match_inline(rest) {
            if !plain.is_empty() {
                inlines.push(Inline::Text(std::mem::take(&mut plain)));
            }
            inlines.push(inline);
            rest = &rest[consumed..];
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    if !plain.is_empty() {
        inlines.push(Inline::Text(plain));
    }

    inlines
}

/// Tries every inline construct that can start at the beginning of `s`.
/// Returns the node and the number of bytes it spans.
fn match_inline(s: &str) -> Option<(Inline, usize)> {
    match *s.as_bytes().first()? {
        b'`' => code_span(s),
        b'!' => image(s),
        b'[' => link(s),
        // strong first, so `**x**` is never read as nested emphasis
        b'*' => strong(s).or_else(|| emphasis(s)),
        _ => None,
    }
}

fn code_span(s: &str) -> Option<(Inline, usize)> {
    let body = s.strip_prefix('`')?;
    let end = body.find('`')?;
    if end == 0 {
        return None;
    }
    Some((Inline::Code(body[..end].to_string()), end + 2))
}

/// `(url)` right at the start of `s`; the url is non-empty.
fn destination(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix('(')?;
    let end = inner.find(')')?;
    if end == 0 {
        return None;
    }
    Some((&inner[..end], end + 2))
}

fn image(s: &str) -> Option<(Inline, usize)> {
    let body = s.strip_prefix("![")?;
    let alt_end = body.find(']')?;
    let (url, url_len) = destination(&body[alt_end + 1..])?;
    let image = Inline::Image {
        alt: body[..alt_end].to_string(),
        url: url.to_string(),
    };
    Some((image, 2 + alt_end + 1 + url_len))
}

fn link(s: &str) -> Option<(Inline, usize)> {
    let body = s.strip_prefix('[')?;

    // an image inside the label does not close it
    let mut i = 0;
    let label_end = loop {
        let rest = &body[i..];
        let c = rest.chars().next()?;
        if c == ']' {
            break i;
        }
        match image(rest) {
            Some((_, consumed)) => i += consumed,
            None => i += c.len_utf8(),
        }
    };
    if label_end == 0 {
        return None;
    }

    let (url, url_len) = destination(&body[label_end + 1..])?;
    let link = Inline::Link {
        content: parse_inlines(&body[..label_end]),
        url: url.to_string(),
    };
    Some((link, 1 + label_end + 1 + url_len))
}

fn strong(s: &str) -> Option<(Inline, usize)> {
    let body = s.strip_prefix("**")?;
    let end = find_star(body, false)?;
    if end == 0 || !body[end..].starts_with("**") {
        return None;
    }
    Some((Inline::Strong(parse_inlines(&body[..end])), end + 4))
}

fn emphasis(s: &str) -> Option<(Inline, usize)> {
    let body = s.strip_prefix('*')?;
    let end = find_star(body, true)?;
    if end == 0 {
        return None;
    }
    Some((Inline::Emphasis(parse_inlines(&body[..end])), end + 2))
}

/// Byte offset of the next `*` in `s` outside code spans. With
/// `skip_strong`, complete `**...**` spans are stepped over as well.
fn find_star(s: &str, skip_strong: bool) -> Option<usize> {
    let mut i = 0;
    while let Some(c) = s[i..].chars().next() {
        match c {
            '`' => match code_span(&s[i..]) {
                Some((_, consumed)) => i += consumed,
                None => i += 1,
            },
            '*' if skip_strong => match strong(&s[i..]) {
                Some((_, consumed)) => i += consumed,
                None => return Some(i),
            },
            '*' => return Some(i),
            _ => i += c.len_utf8(),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let doc = parse("one\ntwo\n\n\n\nthree\n");
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(
            doc.paragraphs[0],
            vec![
                Block::Line(vec![text("one")]),
                Block::Break,
                Block::Line(vec![text("two")]),
            ]
        );
        assert_eq!(doc.paragraphs[1], vec![Block::Line(vec![text("three")])]);
    }

    #[test]
    fn empty_document() {
        assert!(parse("").paragraphs.is_empty());
        assert!(parse("\n\n\n").paragraphs.is_empty());
    }

    #[test]
    fn fence_with_language() {
        let doc = parse("before\n```python\nprint(1)\n```\nafter");
        assert_eq!(
            doc.paragraphs[0],
            vec![
                Block::Line(vec![text("before")]),
                Block::Break,
                Block::Code {
                    language: Some("python".to_string()),
                    code: "print(1)\n".to_string(),
                },
                Block::Break,
                Block::Line(vec![text("after")]),
            ]
        );
    }

    #[test]
    fn fence_keeps_blank_lines_inside() {
        let doc = parse("```\na\n\n\nb\n```");
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(
            doc.paragraphs[0],
            vec![Block::Code {
                language: None,
                code: "a\n\n\nb\n".to_string(),
            }]
        );
    }

    #[test]
    fn unterminated_fence_is_prose() {
        let doc = parse("```rust\nfn main() {}");
        assert_eq!(
            doc.paragraphs[0],
            vec![
                Block::Line(vec![text("```rust")]),
                Block::Break,
                Block::Line(vec![text("fn main() {}")]),
            ]
        );
    }

    #[test]
    fn fence_inside_a_line() {
        let doc = parse("x ```\ncode\n``` # not a heading");
        assert_eq!(
            doc.paragraphs[0],
            vec![
                Block::Line(vec![text("x ")]),
                Block::Code {
                    language: None,
                    code: "code\n".to_string(),
                },
                Block::Line(vec![text(" # not a heading")]),
            ]
        );
    }

    #[test]
    fn trailing_newline_adds_no_break() {
        let doc = parse("\nend\n");
        assert_eq!(doc.paragraphs, vec![vec![Block::Line(vec![text("end")])]]);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            parse_line("###### six"),
            Block::Heading {
                level: 6,
                content: vec![text("six")],
            }
        );
        assert_eq!(
            parse_line("# one"),
            Block::Heading {
                level: 1,
                content: vec![text("one")],
            }
        );
        assert_eq!(
            parse_line("####### seven"),
            Block::Line(vec![text("####### seven")])
        );
        assert_eq!(parse_line("#tag"), Block::Line(vec![text("#tag")]));
        assert_eq!(parse_line("#   "), Block::Line(vec![text("#   ")]));
    }

    #[test]
    fn quote_and_list_markers() {
        assert_eq!(parse_line("> said"), Block::Quote(vec![text("said")]));
        assert_eq!(parse_line(">no space"), Block::Line(vec![text(">no space")]));
        assert_eq!(parse_line("* item"), Block::ListItem(vec![text("item")]));
        assert_eq!(
            parse_line("* item with *emphasis*"),
            Block::ListItem(vec![
                text("item with "),
                Inline::Emphasis(vec![text("emphasis")]),
            ])
        );
    }

    #[test]
    fn strong_before_emphasis() {
        assert_eq!(
            parse_inlines("**x**"),
            vec![Inline::Strong(vec![text("x")])]
        );
        assert_eq!(
            parse_inlines("*a **b** c*"),
            vec![Inline::Emphasis(vec![
                text("a "),
                Inline::Strong(vec![text("b")]),
                text(" c"),
            ])]
        );
        assert_eq!(
            parse_inlines("**x*"),
            vec![text("*"), Inline::Emphasis(vec![text("x")])]
        );
    }

    #[test]
    fn star_inside_code_does_not_close_emphasis() {
        assert_eq!(
            parse_inlines("*see `a*b`*"),
            vec![Inline::Emphasis(vec![
                text("see "),
                Inline::Code("a*b".to_string()),
            ])]
        );
    }

    #[test]
    fn image_wins_over_link() {
        assert_eq!(
            parse_inlines("![alt](a.png)"),
            vec![Inline::Image {
                alt: "alt".to_string(),
                url: "a.png".to_string(),
            }]
        );
        assert_eq!(
            parse_inlines("[![logo](l.png)](/home)"),
            vec![Inline::Link {
                content: vec![Inline::Image {
                    alt: "logo".to_string(),
                    url: "l.png".to_string(),
                }],
                url: "/home".to_string(),
            }]
        );
    }

    #[test]
    fn incomplete_constructs_stay_text() {
        assert_eq!(parse_inlines("[](x)"), vec![text("[](x)")]);
        assert_eq!(parse_inlines("[a]()"), vec![text("[a]()")]);
        assert_eq!(parse_inlines("![a](b"), vec![text("![a](b")]);
        assert_eq!(parse_inlines("``"), vec![text("``")]);
        assert_eq!(parse_inlines("2 * 3 = 6"), vec![text("2 * 3 = 6")]);
    }

    #[test]
    fn link_label_holds_inlines() {
        assert_eq!(
            parse_inlines("see [**docs**](https://example.com) now"),
            vec![
                text("see "),
                Inline::Link {
                    content: vec![Inline::Strong(vec![text("docs")])],
                    url: "https://example.com".to_string(),
                },
                text(" now"),
            ]
        );
    }
}
