use serde::Serialize;
use std::time::SystemTime;

/// One post as read from disk, the input of the index builder.
#[derive(Debug, Clone)]
pub(crate) struct PostSource {
    pub text: String,
    /// File name without `.md`
    pub stem: String,
    pub modified: SystemTime,
}

/// A post's summary in `index.json`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexEntry {
    pub title: String,
    pub date: chrono::NaiveDate,
    pub file: String,
}
