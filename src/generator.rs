use std::path::{Path, PathBuf};

use anyhow::Context as _;
use log::{debug, info};

use crate::{
    context::Context, markdown::Renderer, metadata::split_front_matter, renderer::PageTemplate,
};

mod data;
mod index;
mod utils;

pub(crate) use index::generate_index;

fn generate_page(
    md_path: &Path,
    template: &PageTemplate,
    renderer: &Renderer,
    highlight_css: &str,
) -> anyhow::Result<PathBuf> {
    let text = std::fs::read_to_string(md_path)?;
    let (front_matter, body) = split_front_matter(&text);

    let stem = utils::file_stem(md_path)?;
    let title = utils::page_title(front_matter.title.as_deref(), body, &stem);
    debug!("{md_path:?}: title {title:?}");

    let page = template.fill(&title, &renderer.render(body), highlight_css);
    let html_path = md_path.with_extension("html");
    std::fs::write(&html_path, page)?;

    Ok(html_path)
}

/// Renders every post of the post directory next to its source. Returns the
/// number of pages written.
pub(crate) fn generate_pages(ctx: &Context) -> anyhow::Result<usize> {
    let template = PageTemplate::load(&ctx.template_path)?;
    let renderer = ctx.highlight.renderer()?;
    let highlight_css = renderer.stylesheet();

    let posts = utils::list_posts(&ctx.post_dir)?;
    for md_path in posts.iter() {
        let html_path = generate_page(md_path, &template, &renderer, &highlight_css)
            .with_context(|| format!("while generating from {md_path:?}"))?;
        info!("{} -> {}", md_path.display(), html_path.display());
    }

    Ok(posts.len())
}

/// Pages first, then the index.
pub(crate) fn generate(ctx: &Context) -> anyhow::Result<()> {
    let pages = generate_pages(ctx)?;
    debug!("{pages} pages written");
    generate_index(&ctx.post_dir)
}
