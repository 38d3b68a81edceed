//! Markdown rendering of an [`IntelligenceReport`].

use std::fmt::Write;

use crate::types::IntelligenceReport;

/// Render the report as a standalone markdown document.
#[must_use]
pub fn render_markdown(report: &IntelligenceReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &IntelligenceReport) -> std::fmt::Result {
    writeln!(out, "# Streetwear Intelligence Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    if let Some(fp) = &report.dataset.fingerprint {
        writeln!(out, "Dataset `{}`", &fp[..fp.len().min(12)])?;
    }
    writeln!(out)?;

    if !report.has_data {
        writeln!(out, "_No data loaded._")?;
        return Ok(());
    }

    let s = &report.summary;
    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "| --- | ---: |")?;
    writeln!(out, "| Posts | {} |", s.total_posts)?;
    writeln!(out, "| Unique authors | {} |", s.unique_authors)?;
    writeln!(out, "| Likes | {} |", s.total_likes)?;
    writeln!(out, "| Comments | {} |", s.total_comments)?;
    writeln!(out, "| Shares | {} |", s.total_shares)?;
    writeln!(out, "| Views | {} |", s.total_views)?;
    writeln!(out, "| Total engagement | {} |", s.total_engagement)?;
    writeln!(out, "| Avg engagement | {:.2} |", s.avg_engagement)?;
    if let (Some(first), Some(last)) = (s.earliest_post, s.latest_post) {
        writeln!(
            out,
            "| Date range | {} to {} |",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        )?;
    }
    writeln!(out)?;

    let sent = &report.sentiment;
    writeln!(out, "## Sentiment")?;
    writeln!(out)?;
    writeln!(
        out,
        "- Positive: {}\n- Neutral: {}\n- Negative: {}\n- Mean score: {:.2}",
        sent.positive, sent.neutral, sent.negative, sent.avg_score
    )?;
    writeln!(out)?;

    writeln!(out, "## Brand Leaderboard")?;
    writeln!(out)?;
    writeln!(
        out,
        "| # | Brand | Relationship | Mentions | Share of voice | Avg engagement | Sentiment |"
    )?;
    writeln!(out, "| ---: | --- | --- | ---: | ---: | ---: | ---: |")?;
    for (idx, brand) in report.brands.iter().enumerate() {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.1}% | {:.2} | {:.2} |",
            idx + 1,
            inline(&brand.brand_name),
            brand.relationship,
            brand.mentions,
            brand.share_of_voice,
            brand.avg_engagement,
            brand.avg_sentiment
        )?;
    }
    writeln!(out)?;

    if !report.top_hashtags.is_empty() {
        writeln!(out, "## Top Hashtags")?;
        writeln!(out)?;
        for tag in &report.top_hashtags {
            writeln!(out, "- #{} ({})", inline(&tag.tag), tag.count)?;
        }
        writeln!(out)?;
    }

    if !report.top_posts.is_empty() {
        writeln!(out, "## Top Posts")?;
        writeln!(out)?;
        for post in &report.top_posts {
            let author = inline(post.owner_username.as_deref().unwrap_or("unknown"));
            writeln!(
                out,
                "- [{}] @{author}: {} (engagement {})",
                post.platform,
                inline(&post.caption),
                post.engagement
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Insights")?;
    writeln!(out)?;
    for insight in &report.insights {
        writeln!(out, "- {}", inline(insight))?;
    }

    if !report.dataset.failed_files.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Failed Files")?;
        writeln!(out)?;
        for failed in &report.dataset.failed_files {
            writeln!(
                out,
                "- `{}`: {}",
                code_span(&failed.file_name),
                inline(&failed.error)
            )?;
        }
    }

    Ok(())
}

/// Fold free text onto one line and escape table pipes.
fn inline(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

/// Text for inside a backtick span, where escapes are not interpreted.
fn code_span(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('`', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::analyze_posts;
    use crate::brand_match::BrandMatcher;
    use crate::types::AnalysisOptions;
    use hypewatch_core::{BrandConfig, Platform, Post, Relationship};

    fn matcher() -> BrandMatcher {
        BrandMatcher::new(&[BrandConfig {
            name: "Crooks & Castles".into(),
            relationship: Relationship::Own,
            tier: 2,
            keywords: vec!["crooks".into()],
            price_range: None,
            notes: None,
        }])
    }

    #[test]
    fn no_data_report_says_so() {
        let report = analyze_posts(&[], &matcher(), AnalysisOptions::default());
        let md = render_markdown(&report);
        assert!(md.starts_with("# Streetwear Intelligence Report"));
        assert!(md.contains("_No data loaded._"));
        assert!(!md.contains("## Summary"));
    }

    #[test]
    fn report_includes_every_section() {
        let post = Post {
            id: Some("1".into()),
            platform: Platform::Instagram,
            owner_username: Some("hypebeast".into()),
            caption: "Crooks hoodie is fire".into(),
            hashtags: vec!["streetwear".into()],
            likes_count: 40,
            comments_count: 2,
            shares_count: 0,
            views_count: 0,
            timestamp: None,
            url: None,
            source_file: None,
        };
        let report = analyze_posts(&[post], &matcher(), AnalysisOptions::default());
        let md = render_markdown(&report);

        for heading in [
            "## Summary",
            "## Sentiment",
            "## Brand Leaderboard",
            "## Top Hashtags",
            "## Top Posts",
            "## Insights",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
        assert!(md.contains("| Posts | 1 |"));
        assert!(md.contains("| 1 | Crooks & Castles | own | 1 | 100.0% |"));
        assert!(md.contains("- #streetwear (1)"));
        assert!(md.contains("@hypebeast"));
    }

    #[test]
    fn free_text_cannot_break_tables_or_lists() {
        let post = Post {
            id: Some("2".into()),
            platform: Platform::Instagram,
            owner_username: Some("pipe|user".into()),
            caption: "Crooks drop\n\n| restock | soon".into(),
            hashtags: Vec::new(),
            likes_count: 5,
            comments_count: 0,
            shares_count: 0,
            views_count: 0,
            timestamp: None,
            url: None,
            source_file: None,
        };
        let matcher = BrandMatcher::new(&[BrandConfig {
            name: "Crooks | Castles".into(),
            relationship: Relationship::Own,
            tier: 2,
            keywords: vec!["crooks".into()],
            price_range: None,
            notes: None,
        }]);
        let report = analyze_posts(&[post], &matcher, AnalysisOptions::default());
        let md = render_markdown(&report);

        assert!(md.contains("| 1 | Crooks \\| Castles | own |"));
        assert!(md.contains("@pipe\\|user: Crooks drop \\| restock \\| soon (engagement 5)"));
        assert!(!md.lines().any(|l| l.starts_with("| restock")));
    }

    #[test]
    fn inline_collapses_whitespace_and_escapes_pipes() {
        assert_eq!(inline("  a\tb\r\n c|d "), "a b c\\|d");
        assert_eq!(code_span("bad`name\n.json"), "bad'name .json");
    }
}
