use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Metadata found in a leading `---` block. Fields are `None` when the block
/// or the key is absent; resolving fallbacks is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
}

// opening marker, at least one header line, closing marker line
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\A\u{feff}?---\r?\n(.+?)\r?\n---[ \t]*(?:\r?\n|\z)")
        .dot_matches_new_line(true)
        .build()
        .expect("front matter pattern is valid")
});

pub(crate) fn extract_front_matter(text: &str) -> FrontMatter {
    split_front_matter(text).0
}

/// Splits a post into its front matter and the body following the closing
/// marker. Without a front matter block, the body is the whole text.
pub(crate) fn split_front_matter(text: &str) -> (FrontMatter, &str) {
    let Some(caps) = HEADER_PATTERN.captures(text) else {
        return (FrontMatter::default(), text);
    };

    let mut front_matter = FrontMatter::default();
    for line in caps[1].lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = unquote(value.trim());
        if value.is_empty() {
            continue;
        }
        // only title and date are meaningful for a post
        match name {
            "title" => front_matter.title = Some(value.to_string()),
            "date" => front_matter.date = Some(value.to_string()),
            _ => {}
        }
    }

    let body_start = caps.get(0).map_or(0, |m| m.end());
    (front_matter, &text[body_start..])
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
