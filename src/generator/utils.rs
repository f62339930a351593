use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
    sync::LazyLock,
    time::SystemTime,
};

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;

use super::data::IndexEntry;

static LEADING_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(\S.*)$").expect("title pattern is valid"));

/// Markdown files directly inside `dir`, ordered by file name.
pub(super) fn list_posts(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut posts = vec![];
    for entry in std::fs::read_dir(dir).with_context(|| format!("while reading {dir:?}"))? {
        let path = entry?.path();
        // follows symlinks, so linked posts are included
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            posts.push(path);
        }
    }
    posts.sort();

    Ok(posts)
}

pub(super) fn file_stem(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("{path:?} has no file name"))
}

/// Title of a rendered page: front matter, else a `# ` heading on the first
/// line of the body, else the file stem.
pub(super) fn page_title(front_matter_title: Option<&str>, body: &str, stem: &str) -> String {
    if let Some(title) = front_matter_title {
        return title.to_string();
    }
    body.lines()
        .next()
        .and_then(|line| LEADING_TITLE.captures(line))
        .map_or_else(|| stem.to_string(), |caps| caps[1].trim().to_string())
}

/// Title of an index entry without front matter title: `my-first-post`
/// becomes `my first post`.
pub(super) fn fallback_title(stem: &str) -> String {
    stem.replace('-', " ")
}

/// The local calendar day of a modification time.
pub(super) fn modified_date(modified: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(modified).date_naive()
}

/// Newest first. Used with a stable sort, so equal dates keep their order.
pub(super) fn sort_entry(a: &IndexEntry, b: &IndexEntry) -> Ordering {
    b.date.cmp(&a.date)
}
