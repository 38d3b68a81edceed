//! JSON / JSONL file loading.
//!
//! JSONL is read as a stream, one line at a time; a line that is not valid
//! JSON or not an object is counted and skipped rather than failing the file.
//! Whole-document JSON is parsed once and flattened into a record list.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::IngestError;
use crate::normalize::normalize_record;
use crate::types::{file_name_of, Dataset, FailedFile, FileFormat, LoadedFile};

/// Wrapper keys scrapers use around the record array of a JSON document.
const WRAPPER_KEYS: &[&str] = &["data", "items", "posts", "results"];

/// Raw JSON objects read from one source, before normalization.
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub records: Vec<Map<String, Value>>,
    /// Lines or elements that were not JSON objects.
    pub skipped: usize,
}

/// Read newline-delimited JSON records from `reader`.
///
/// Blank lines are ignored. Lines that fail to parse, or parse to something
/// other than an object, are counted in [`RecordBatch::skipped`].
///
/// # Errors
///
/// Returns [`IngestError::Io`] only if the underlying reader fails.
pub fn read_jsonl<R: BufRead>(mut reader: R, context: &str) -> Result<RecordBatch, IngestError> {
    let mut batch = RecordBatch::default();
    let mut line = Vec::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| IngestError::Io {
                path: context.to_string(),
                source: e,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<Value>(&line) {
            Ok(Value::Object(map)) => batch.records.push(map),
            Ok(_) => {
                tracing::debug!(source = context, line = line_no, "skipping non-object JSONL line");
                batch.skipped += 1;
            }
            Err(e) => {
                tracing::debug!(source = context, line = line_no, error = %e, "skipping malformed JSONL line");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

/// Read a single JSON document from `reader` and flatten it into records.
///
/// - an array yields its object elements (non-objects are skipped)
/// - an object with an array under `data`, `items`, `posts` or `results`
///   yields that array
/// - any other object is one record
///
/// # Errors
///
/// Returns [`IngestError::Json`] if the document does not parse and
/// [`IngestError::UnsupportedDocument`] if it is a bare scalar.
pub fn read_json_document<R: Read>(reader: R, context: &str) -> Result<RecordBatch, IngestError> {
    let document: Value =
        serde_json::from_reader(reader).map_err(|e| IngestError::Json {
            context: context.to_string(),
            source: e,
        })?;

    match document {
        Value::Array(items) => Ok(collect_objects(items)),
        Value::Object(mut map) => {
            let wrapped = WRAPPER_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array))
                .copied();
            match wrapped.and_then(|key| map.remove(key)) {
                Some(Value::Array(items)) => Ok(collect_objects(items)),
                _ => Ok(RecordBatch {
                    records: vec![map],
                    skipped: 0,
                }),
            }
        }
        _ => Err(IngestError::UnsupportedDocument {
            path: context.to_string(),
        }),
    }
}

fn collect_objects(items: Vec<Value>) -> RecordBatch {
    let mut batch = RecordBatch::default();
    for item in items {
        match item {
            Value::Object(map) => batch.records.push(map),
            _ => batch.skipped += 1,
        }
    }
    batch
}

/// Load and normalize one export file.
///
/// `.jsonl` / `.ndjson` are read line by line. `.json` is parsed as one
/// document; if that fails it is re-read as JSONL, since several scrapers
/// write line-delimited output under a `.json` name. Other extensions are
/// sniffed: a leading `[` or `{` is tried as one document (falling back to
/// JSONL like `.json`), anything else is JSONL.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be opened or read, and
/// [`IngestError::UnsupportedDocument`] for a `.json` file holding a bare scalar.
pub fn load_file(path: &Path) -> Result<LoadedFile, IngestError> {
    let context = path.display().to_string();
    let file_name = file_name_of(path);

    let (format, batch, sha256) = match detect_format(path)? {
        FileFormat::Jsonl => {
            let (batch, sha) = read_hashed(path, |r| read_jsonl(BufReader::new(r), &context))?;
            (FileFormat::Jsonl, batch, sha)
        }
        FileFormat::Json => {
            match read_hashed(path, |r| read_json_document(BufReader::new(r), &context)) {
                Ok((batch, sha)) => (FileFormat::Json, batch, sha),
                Err(IngestError::Json { source, .. }) => {
                    tracing::debug!(
                        file = %file_name,
                        error = %source,
                        "not a single JSON document; retrying as JSONL"
                    );
                    let (batch, sha) =
                        read_hashed(path, |r| read_jsonl(BufReader::new(r), &context))?;
                    (FileFormat::Jsonl, batch, sha)
                }
                Err(e) => return Err(e),
            }
        }
    };

    let mut skipped_records = batch.skipped;
    let mut posts = Vec::with_capacity(batch.records.len());
    for record in &batch.records {
        match normalize_record(record, Some(&file_name)) {
            Some(post) => posts.push(post),
            None => skipped_records += 1,
        }
    }

    tracing::debug!(
        file = %file_name,
        format = %format,
        valid = posts.len(),
        skipped = skipped_records,
        "loaded export file"
    );

    Ok(LoadedFile {
        path: path.to_path_buf(),
        format,
        posts,
        skipped_records,
        sha256,
    })
}

/// Load every `.json` / `.jsonl` / `.ndjson` file directly inside `dir`.
///
/// Files are visited in name order. A file that fails to load is logged,
/// recorded in [`Dataset::failed_files`], and skipped. A missing directory
/// is an empty dataset, not an error.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the directory exists but cannot be listed.
pub fn load_dir(dir: &Path) -> Result<Dataset, IngestError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "data directory does not exist; no data loaded");
            return Ok(Dataset::default());
        }
        Err(e) => {
            return Err(IngestError::Io {
                path: dir.display().to_string(),
                source: e,
            })
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_export_file(path))
        .collect();
    paths.sort();

    let mut dataset = Dataset::default();
    let mut fingerprint = Sha256::new();

    for path in &paths {
        match load_file(path) {
            Ok(loaded) => {
                fingerprint.update(loaded.file_name().as_bytes());
                fingerprint.update(loaded.sha256.as_bytes());
                dataset.files.push(loaded.summary());
                dataset.posts.extend(loaded.posts);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to load export file; skipping");
                dataset.failed_files.push(FailedFile {
                    file_name: file_name_of(path),
                    error: e.to_string(),
                });
            }
        }
    }

    if !dataset.files.is_empty() {
        dataset.fingerprint = Some(hex(&fingerprint.finalize()));
    }

    tracing::info!(
        dir = %dir.display(),
        files = dataset.files.len(),
        failed = dataset.failed_files.len(),
        posts = dataset.posts.len(),
        skipped = dataset.skipped_records(),
        "data directory loaded"
    );

    Ok(dataset)
}

fn is_export_file(path: &Path) -> bool {
    matches!(
        extension_lower(path).as_deref(),
        Some("json" | "jsonl" | "ndjson")
    )
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn detect_format(path: &Path) -> Result<FileFormat, IngestError> {
    match extension_lower(path).as_deref() {
        Some("jsonl" | "ndjson") => Ok(FileFormat::Jsonl),
        Some("json") => Ok(FileFormat::Json),
        _ => sniff_format(path),
    }
}

fn sniff_format(path: &Path) -> Result<FileFormat, IngestError> {
    let file = open(path)?;
    let mut first = None;
    for byte in BufReader::new(file).bytes() {
        let byte = byte.map_err(|e| IngestError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        if !byte.is_ascii_whitespace() {
            first = Some(byte);
            break;
        }
    }
    Ok(if matches!(first, Some(b'[' | b'{')) {
        FileFormat::Json
    } else {
        FileFormat::Jsonl
    })
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Run `read` over the file while hashing every byte it consumes.
fn read_hashed<T, F>(path: &Path, read: F) -> Result<(T, String), IngestError>
where
    F: FnOnce(&mut HashingReader<File>) -> Result<T, IngestError>,
{
    let mut reader = HashingReader::new(open(path)?);
    let value = read(&mut reader)?;
    // Drain anything the parser did not need (e.g. trailing whitespace).
    std::io::copy(&mut reader, &mut std::io::sink()).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok((value, reader.finish()))
}

/// `Read` adapter feeding consumed bytes into a SHA-256 hasher.
pub(crate) struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> String {
        hex(&self.hasher.finalize())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_counts_malformed_lines() {
        let input = b"{\"caption\":\"a\"}\nnot json\n{\"caption\":\"b\"}\n\n[1,2]\n{\"caption\":";
        let batch = read_jsonl(&input[..], "test").unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped, 3);
    }

    #[test]
    fn jsonl_handles_crlf_and_missing_trailing_newline() {
        let input = b"{\"caption\":\"a\"}\r\n{\"caption\":\"b\"}";
        let batch = read_jsonl(&input[..], "test").unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn jsonl_skips_invalid_utf8_line() {
        let input = b"{\"caption\":\"a\"}\n\xff\xfe\n";
        let batch = read_jsonl(&input[..], "test").unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn json_array_document() {
        let input = br#"[{"caption":"a"}, 3, {"caption":"b"}]"#;
        let batch = read_json_document(&input[..], "test").unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn json_wrapped_document() {
        let input = br#"{"meta":{"count":2},"items":[{"caption":"a"},{"caption":"b"}]}"#;
        let batch = read_json_document(&input[..], "test").unwrap();
        assert_eq!(batch.records.len(), 2);
    }

    #[test]
    fn json_single_object_document() {
        let input = br#"{"caption":"solo","likesCount":3}"#;
        let batch = read_json_document(&input[..], "test").unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0]["caption"], "solo");
    }

    #[test]
    fn json_scalar_document_is_unsupported() {
        let err = read_json_document(&b"42"[..], "test").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedDocument { .. }));
    }

    #[test]
    fn json_syntax_error_is_reported() {
        let err = read_json_document(&b"[{\"caption\":"[..], "test").unwrap_err();
        assert!(matches!(err, IngestError::Json { .. }));
    }

    #[test]
    fn hex_encodes_lowercase() {
        assert_eq!(hex(&[0x00, 0xab, 0x10]), "00ab10");
    }
}
