//! `ingest` command handlers.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use hypewatch_ingest::{load_dir, load_file, FileSummary};

/// Sub-commands available under `ingest`.
#[derive(Debug, Subcommand)]
pub enum IngestCommands {
    /// Report valid and skipped record counts per export file
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct CheckOutcome {
    pub lines: Vec<String>,
    pub failures: usize,
}

/// Print per-file counts for every path.
///
/// # Errors
///
/// Returns an error when any file could not be read at all, after reporting
/// every path.
pub(crate) fn run_ingest_check(paths: &[PathBuf]) -> anyhow::Result<()> {
    let outcome = check_paths(paths);
    for line in &outcome.lines {
        println!("{line}");
    }
    if outcome.failures > 0 {
        anyhow::bail!("{} file(s) could not be loaded", outcome.failures);
    }
    Ok(())
}

pub(crate) fn check_paths(paths: &[PathBuf]) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    for path in paths {
        if path.is_dir() {
            check_dir(path, &mut outcome);
        } else {
            match load_file(path) {
                Ok(loaded) => outcome.lines.push(format_file(&loaded.summary())),
                Err(e) => {
                    tracing::debug!(file = %path.display(), error = %e, "ingest check failed");
                    outcome.failures += 1;
                    outcome.lines.push(format!("{}: error: {e}", path.display()));
                }
            }
        }
    }
    outcome
}

fn check_dir(dir: &Path, outcome: &mut CheckOutcome) {
    match load_dir(dir) {
        Ok(dataset) => {
            if dataset.files.is_empty() && dataset.failed_files.is_empty() {
                outcome
                    .lines
                    .push(format!("{}: no export files", dir.display()));
            }
            for file in &dataset.files {
                outcome.lines.push(format_file(file));
            }
            for failed in &dataset.failed_files {
                outcome.failures += 1;
                outcome
                    .lines
                    .push(format!("{}: error: {}", failed.file_name, failed.error));
            }
        }
        Err(e) => {
            outcome.failures += 1;
            outcome.lines.push(format!("{}: error: {e}", dir.display()));
        }
    }
}

fn format_file(file: &FileSummary) -> String {
    format!(
        "{}: {} valid, {} skipped ({})",
        file.file_name, file.valid_records, file.skipped_records, file.format
    )
}
