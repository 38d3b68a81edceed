use std::path::PathBuf;

use hypewatch_core::Post;
use serde::Serialize;

/// On-disk layout of a scraped export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// A single JSON document: an array of records, a wrapper object, or one record.
    Json,
    /// One JSON record per line.
    Jsonl,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Json => write!(f, "json"),
            FileFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Result of loading one export file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub format: FileFormat,
    pub posts: Vec<Post>,
    /// Lines or array elements that could not be turned into a post.
    pub skipped_records: usize,
    /// Hex SHA-256 of the bytes read.
    pub sha256: String,
}

impl LoadedFile {
    #[must_use]
    pub fn valid_records(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    #[must_use]
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            file_name: self.file_name(),
            format: self.format,
            valid_records: self.valid_records(),
            skipped_records: self.skipped_records,
        }
    }
}

/// Per-file counts kept on a [`Dataset`] after its posts are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub file_name: String,
    pub format: FileFormat,
    pub valid_records: usize,
    pub skipped_records: usize,
}

/// A file in the data directory that could not be loaded at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file_name: String,
    pub error: String,
}

/// Every post loaded from a data directory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub posts: Vec<Post>,
    pub files: Vec<FileSummary>,
    pub failed_files: Vec<FailedFile>,
    /// Hex SHA-256 over each loaded file's name and content hash.
    /// `None` when nothing was loaded.
    pub fingerprint: Option<String>,
}

impl Dataset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    #[must_use]
    pub fn skipped_records(&self) -> usize {
        self.files.iter().map(|f| f.skipped_records).sum()
    }
}

pub(crate) fn file_name_of(path: &std::path::Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
