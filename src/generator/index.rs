use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, info, warn};

use super::{
    data::{IndexEntry, PostSource},
    utils,
};
use crate::metadata::extract_front_matter;

pub(crate) const INDEX_FILE: &str = "index.json";

/// Front matter dates must start with `YYYY-MM-DD`; they come out
/// zero-padded. Anything after the day, like a time, is dropped with a
/// warning.
fn parse_date(value: &str, stem: &str) -> anyhow::Result<NaiveDate> {
    let (date, rest) = NaiveDate::parse_and_remainder(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date {value:?}, expected YYYY-MM-DD"))?;
    if !rest.trim().is_empty() {
        warn!("{stem}.md: ignoring {:?} after the date {date}", rest.trim());
    }

    Ok(date)
}

/// Builds the entries for `sources`, newest first.
pub(crate) fn build_index(sources: &[PostSource]) -> anyhow::Result<Vec<IndexEntry>> {
    let mut entries = Vec::with_capacity(sources.len());
    for source in sources {
        let front_matter = extract_front_matter(&source.text);

        let title = front_matter
            .title
            .unwrap_or_else(|| utils::fallback_title(&source.stem));
        let date = match front_matter.date {
            Some(ref value) => {
                parse_date(value, &source.stem)
                    .with_context(|| format!("while indexing {}.md", source.stem))?
            }
            None => {
                debug!("{}.md has no date, using its modification time", source.stem);
                utils::modified_date(source.modified)
            }
        };

        entries.push(IndexEntry {
            title,
            date,
            file: format!("{}.html", source.stem),
        });
    }
    entries.sort_by(utils::sort_entry);

    Ok(entries)
}

pub(crate) fn read_sources(post_dir: &Path) -> anyhow::Result<Vec<PostSource>> {
    let mut sources = vec![];
    for path in utils::list_posts(post_dir)? {
        let text =
            std::fs::read_to_string(&path).with_context(|| format!("while reading {path:?}"))?;
        let modified = std::fs::metadata(&path)?.modified()?;
        sources.push(PostSource {
            text,
            stem: utils::file_stem(&path)?,
            modified,
        });
    }

    Ok(sources)
}

/// Writes `index.json` into `post_dir`, replacing any previous one.
pub(crate) fn write_index(post_dir: &Path, entries: &[IndexEntry]) -> anyhow::Result<PathBuf> {
    let index_path = post_dir.join(INDEX_FILE);
    let fd = File::create(&index_path).with_context(|| format!("while creating {index_path:?}"))?;
    let mut writer = BufWriter::new(fd);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.flush()?;

    Ok(index_path)
}

pub(crate) fn generate_index(post_dir: &Path) -> anyhow::Result<()> {
    let sources = read_sources(post_dir)?;
    let entries = build_index(&sources)?;
    let index_path = write_index(post_dir, &entries)?;
    info!("Updated {} ({} posts)", index_path.display(), entries.len());

    Ok(())
}
