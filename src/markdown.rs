//! Markdown to HTML for post bodies.
//!
//! The body is parsed once into a small tree of blocks and inlines, then
//! rendered. Supported syntax: fenced code, inline code, images, links,
//! `#` headings, `**strong**`, `*emphasis*`, `> ` quotes and `* ` list items.
//! Anything else, raw HTML included, passes through untouched.

mod ast;
mod highlight;
mod html;
mod parser;

pub(crate) use highlight::{Highlighter, NoHighlight, SyntectHighlighter, DEFAULT_THEME};

pub(crate) struct Renderer {
    highlighter: Box<dyn Highlighter>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Box::new(NoHighlight))
    }
}

impl Renderer {
    pub fn new(highlighter: Box<dyn Highlighter>) -> Self {
        Self { highlighter }
    }

    /// Renders a post body to an HTML fragment. Never fails.
    pub fn render(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n");
        let doc = parser::parse(&text);

        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, &doc, self.highlighter.as_ref());
        out
    }

    pub fn stylesheet(&self) -> String {
        self.highlighter.stylesheet()
    }
}
