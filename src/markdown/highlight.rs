use anyhow::Context as _;
use maud::{html, PreEscaped};
use syntect::{
    highlighting::ThemeSet,
    html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

/// Pluggable code block rendering. Returning `None` falls back to the plain
/// escaped `<pre><code>` block.
pub(crate) trait Highlighter {
    fn try_highlight(&self, language: Option<&str>, code: &str) -> Option<String>;

    /// Markup for the page's `{{highlight_css}}` slot.
    fn stylesheet(&self) -> String {
        String::new()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NoHighlight;

impl Highlighter for NoHighlight {
    fn try_highlight(&self, _language: Option<&str>, _code: &str) -> Option<String> {
        None
    }
}

pub(crate) const DEFAULT_THEME: &str = "base16-ocean.dark";

const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Server-side highlighting with the syntaxes and themes bundled in syntect.
/// Tokens become `<span class="...">`; the colors come from the stylesheet
/// generated for the chosen theme.
pub(crate) struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    css: String,
}

impl SyntectHighlighter {
    pub fn new(theme_name: &str) -> anyhow::Result<Self> {
        let themes = ThemeSet::load_defaults();
        let Some(theme) = themes.themes.get(theme_name) else {
            let known: Vec<&str> = themes.themes.keys().map(String::as_str).collect();
            anyhow::bail!("unknown highlight theme {theme_name:?}, expected one of {known:?}");
        };
        let css = css_for_theme_with_class_style(theme, CLASS_STYLE)
            .with_context(|| format!("while building the stylesheet of {theme_name:?}"))?;

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            css,
        })
    }

    /// The syntax named by the fence, else one guessed from the first line
    /// (`#!/bin/sh`, `<?xml`, ...).
    fn find_syntax(&self, language: Option<&str>, code: &str) -> Option<&SyntaxReference> {
        match language {
            Some(token) => self.syntaxes.find_syntax_by_token(token),
            None => self
                .syntaxes
                .find_syntax_by_first_line(code.lines().next()?)
                .filter(|syntax| syntax.name != "Plain Text"),
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn try_highlight(&self, language: Option<&str>, code: &str) -> Option<String> {
        let code = code.trim();
        let syntax = self.find_syntax(language, code)?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line).ok()?;
        }
        let body = generator.finalize();

        Some(
            html! {
                pre.highlight { code { (PreEscaped(body)) } }
            }
            .into_string(),
        )
    }

    fn stylesheet(&self) -> String {
        html! { style { (PreEscaped(&self.css)) } }.into_string()
    }
}
