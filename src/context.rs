use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::ArgMatches;

use crate::markdown::{NoHighlight, Renderer, SyntectHighlighter};

/// How fenced code blocks are rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum HighlightMode {
    #[default]
    Off,
    /// Server-side highlighting, colored by the named theme
    Syntax { theme: String },
}

impl HighlightMode {
    /// Fails on an unknown theme.
    pub fn renderer(&self) -> anyhow::Result<Renderer> {
        Ok(match self {
            HighlightMode::Off => Renderer::new(Box::new(NoHighlight)),
            HighlightMode::Syntax { theme } => {
                Renderer::new(Box::new(SyntectHighlighter::new(theme)?))
            }
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub post_dir: PathBuf,
    pub template_path: PathBuf,
    pub highlight: HighlightMode,
}

impl Context {
    pub fn new(
        post_dir: PathBuf,
        template_path: PathBuf,
        highlight: HighlightMode,
    ) -> anyhow::Result<Self> {
        if !post_dir.is_dir() {
            bail!("post directory {post_dir:?} must be a directory.");
        }
        Ok(Self {
            post_dir,
            template_path,
            highlight,
        })
    }

    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let post_dir: &PathBuf = matches.get_one("posts").context("--posts")?;
        let template_path: &PathBuf = matches.get_one("template").context("--template")?;
        let highlight = if matches.get_flag("highlight") {
            let theme: &String = matches.get_one("theme").context("--theme")?;
            HighlightMode::Syntax {
                theme: theme.to_owned(),
            }
        } else {
            HighlightMode::Off
        };

        Self::new(post_dir.to_owned(), template_path.to_owned(), highlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_post_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Context::new(missing, "template.html".into(), HighlightMode::Off).unwrap_err();
        assert!(err.to_string().contains("must be a directory"));
    }

    #[test]
    fn highlight_mode_selects_stylesheet() {
        assert!(HighlightMode::Off.renderer().unwrap().stylesheet().is_empty());

        let syntax = HighlightMode::Syntax {
            theme: crate::markdown::DEFAULT_THEME.to_string(),
        };
        assert!(syntax.renderer().unwrap().stylesheet().starts_with("<style>"));
    }

    #[test]
    fn unknown_theme_fails_renderer() {
        let syntax = HighlightMode::Syntax {
            theme: "no-such-theme".to_string(),
        };
        assert!(syntax.renderer().is_err());
    }
}
