//! `analyze` and `report` command handlers.

use std::fmt::Write as _;
use std::path::Path;

use hypewatch_core::AppConfig;
use hypewatch_sentiment::{render_markdown, run_analysis, AnalysisOptions, IntelligenceReport};

fn options_for(config: &AppConfig, brand_filter: Option<&str>) -> AnalysisOptions {
    AnalysisOptions {
        top_hashtags: config.top_hashtags,
        brand_filter: brand_filter.map(ToOwned::to_owned),
        ..AnalysisOptions::default()
    }
}

/// Analyze `data_dir` and print either a short summary or the full JSON report.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded, `brand_filter` names a
/// brand that is not in the roster, or the data directory cannot be listed.
pub(crate) fn run_analyze(
    config: &AppConfig,
    brands_path: &Path,
    data_dir: &Path,
    brand_filter: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let roster = hypewatch_core::load_brands(brands_path)?;
    if let Some(slug) = brand_filter {
        if roster.find_by_slug(slug).is_none() {
            anyhow::bail!("brand '{slug}' is not in {}", brands_path.display());
        }
    }

    let report = run_analysis(data_dir, &roster.brands, options_for(config, brand_filter))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_summary(&report));
    }
    Ok(())
}

/// Analyze `data_dir` and write the markdown report to `output` or stdout.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded, the data directory cannot
/// be listed, or the output file cannot be written.
pub(crate) fn run_report(
    config: &AppConfig,
    brands_path: &Path,
    data_dir: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let roster = hypewatch_core::load_brands(brands_path)?;
    let report = run_analysis(data_dir, &roster.brands, options_for(config, None))?;
    let markdown = render_markdown(&report);

    match output {
        Some(path) => {
            std::fs::write(path, markdown)?;
            println!("report written to {}", path.display());
        }
        None => print!("{markdown}"),
    }
    Ok(())
}

/// Plain-text summary for terminal output.
pub(crate) fn format_summary(report: &IntelligenceReport) -> String {
    let mut out = String::new();
    if !report.has_data {
        out.push_str("no data loaded\n");
        return out;
    }

    let s = &report.summary;
    let _ = writeln!(
        out,
        "posts: {}  authors: {}  engagement: {} (avg {:.2})",
        s.total_posts, s.unique_authors, s.total_engagement, s.avg_engagement
    );
    let _ = writeln!(
        out,
        "sentiment: +{} ={} -{} (mean {:.2})",
        report.sentiment.positive,
        report.sentiment.neutral,
        report.sentiment.negative,
        report.sentiment.avg_score
    );
    if report.dataset.skipped_records > 0 || !report.dataset.failed_files.is_empty() {
        let _ = writeln!(
            out,
            "skipped records: {}  failed files: {}",
            report.dataset.skipped_records,
            report.dataset.failed_files.len()
        );
    }

    out.push_str("\nbrands:\n");
    for brand in report.brands.iter().filter(|b| b.mentions > 0) {
        let _ = writeln!(
            out,
            "  {:<24} {:>6} mentions  {:>5.1}%  sentiment {:+.2}",
            brand.brand_name, brand.mentions, brand.share_of_voice, brand.avg_sentiment
        );
    }

    if !report.top_hashtags.is_empty() {
        let tags: Vec<String> = report
            .top_hashtags
            .iter()
            .map(|h| format!("#{} ({})", h.tag, h.count))
            .collect();
        let _ = writeln!(out, "\nhashtags: {}", tags.join(", "));
    }

    out.push_str("\ninsights:\n");
    for insight in &report.insights {
        let _ = writeln!(out, "  - {insight}");
    }
    out
}
