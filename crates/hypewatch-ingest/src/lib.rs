//! Loading of scraped social-media exports.
//!
//! Reads `.json` / `.jsonl` files produced by the Instagram, TikTok and
//! Twitter scrapers, normalizes each record into a [`hypewatch_core::Post`],
//! and reports how many lines were skipped along the way.

pub mod error;
pub mod loader;
pub mod normalize;
pub mod types;

mod parse_helpers;

pub use error::IngestError;
pub use loader::{load_dir, load_file, read_json_document, read_jsonl, RecordBatch};
pub use normalize::normalize_record;
pub use parse_helpers::extract_caption_hashtags;
pub use types::{Dataset, FailedFile, FileFormat, FileSummary, LoadedFile};
