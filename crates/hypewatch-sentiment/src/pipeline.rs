//! Analysis pipeline orchestration.

use std::path::Path;

use hypewatch_core::BrandConfig;
use hypewatch_ingest::load_dir;

use crate::aggregate::analyze_dataset;
use crate::brand_match::BrandMatcher;
use crate::error::AnalysisError;
use crate::types::{AnalysisOptions, IntelligenceReport};

/// Load every scrape export under `data_dir` and aggregate it.
///
/// 1. Load and normalize all `.json` / `.jsonl` files (see [`load_dir`]).
/// 2. Bucket posts against the configured brand roster.
/// 3. Fold everything into an [`IntelligenceReport`].
///
/// A missing or empty directory yields the "no data" report rather than an
/// error. Files that fail to read are recorded in `dataset.failed_files`.
///
/// # Errors
///
/// Returns [`AnalysisError::Ingest`] only if `data_dir` exists but cannot be
/// listed.
pub fn run_analysis(
    data_dir: &Path,
    brands: &[BrandConfig],
    options: AnalysisOptions,
) -> Result<IntelligenceReport, AnalysisError> {
    let dataset = load_dir(data_dir)?;

    if dataset.is_empty() {
        tracing::info!(
            data_dir = %data_dir.display(),
            "no posts loaded, returning no-data report"
        );
    }

    let matcher = BrandMatcher::new(brands);
    let report = analyze_dataset(&dataset, &matcher, options);

    tracing::info!(
        posts = report.summary.total_posts,
        files = report.dataset.files.len(),
        failed_files = report.dataset.failed_files.len(),
        skipped_records = report.dataset.skipped_records,
        brands = report.brands.len(),
        "analysis complete"
    );

    Ok(report)
}
