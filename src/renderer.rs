use std::{path::Path, sync::LazyLock};

use anyhow::{bail, Context};
use log::warn;
use maud::html;
use regex::{Captures, Regex};

const TITLE: &str = "{{title}}";
const CONTENT: &str = "{{content}}";
const HIGHLIGHT_CSS: &str = "{{highlight_css}}";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(title|content|highlight_css)\}\}").expect("placeholder pattern is valid")
});

/// Page layout with literal `{{title}}`, `{{content}}` and
/// `{{highlight_css}}` slots. No other template syntax exists.
#[derive(Debug, Clone)]
pub(crate) struct PageTemplate {
    source: String,
}

impl PageTemplate {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("while reading template {path:?}"))?;
        Self::new(source).with_context(|| format!("invalid template {path:?}"))
    }

    pub fn new(source: String) -> anyhow::Result<Self> {
        for placeholder in [TITLE, CONTENT] {
            if !source.contains(placeholder) {
                bail!("missing {placeholder} placeholder");
            }
        }
        if !source.contains(HIGHLIGHT_CSS) {
            warn!("template has no {HIGHLIGHT_CSS} placeholder; code styles will not be included");
        }
        Ok(Self { source })
    }

    /// Fills every slot in one pass, so placeholder text inside the inserted
    /// content is left alone. The title is HTML-escaped; content and css are
    /// inserted as is.
    pub fn fill(&self, title: &str, content: &str, highlight_css: &str) -> String {
        let title = html! { (title) }.into_string();
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures| match &caps[1] {
                "title" => title.clone(),
                "content" => content.to_string(),
                _ => highlight_css.to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str =
        "<html><head><title>{{title}}</title>{{highlight_css}}</head><body>{{content}}</body></html>";

    #[test]
    fn fills_all_slots() {
        let template = PageTemplate::new(LAYOUT.to_string()).unwrap();
        let page = template.fill("Tom & Jerry", "<p>hi</p>", "");
        assert_eq!(
            page,
            "<html><head><title>Tom &amp; Jerry</title></head><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn repeated_placeholders() {
        let template = PageTemplate::new("{{title}}|{{content}}|{{title}}".to_string()).unwrap();
        assert_eq!(template.fill("t", "c", "s"), "t|c|t");
    }

    #[test]
    fn content_placeholders_are_not_expanded() {
        let template = PageTemplate::new(LAYOUT.to_string()).unwrap();
        let page = template.fill("t", "write {{title}} and {{highlight_css}}", "<style></style>");
        assert!(page.contains("<body>write {{title}} and {{highlight_css}}</body>"));
        assert!(page.contains("<title>t</title><style></style>"));
    }

    #[test]
    fn missing_content_is_invalid() {
        let err = PageTemplate::new("<title>{{title}}</title>".to_string()).unwrap_err();
        assert!(err.to_string().contains("{{content}}"));
    }

    #[test]
    fn missing_css_slot_is_allowed() {
        assert!(PageTemplate::new("{{title}}{{content}}".to_string()).is_ok());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PageTemplate::load(&dir.path().join("template.html")).unwrap_err();
        assert!(format!("{err:#}").contains("while reading template"));
    }
}
