use std::fs;

use hypewatch_core::parse_brands;
use hypewatch_sentiment::{render_markdown, run_analysis, AnalysisOptions};

const BRANDS: &str = r#"
brands:
  - name: "Crooks & Castles"
    relationship: own
    tier: 2
    keywords: ["crooks", "medusa chain"]
  - name: Supreme
    relationship: competitor
    tier: 1
    keywords: ["box logo"]
"#;

#[test]
fn missing_directory_gives_no_data_report() {
    let dir = tempfile::tempdir().unwrap();
    let brands = parse_brands(BRANDS).unwrap();

    let report = run_analysis(
        &dir.path().join("nope"),
        &brands.brands,
        AnalysisOptions::default(),
    )
    .unwrap();

    assert!(!report.has_data);
    assert_eq!(report.insights, vec!["no data loaded".to_string()]);
    assert_eq!(report.brands.len(), 2);
    assert!(report.dataset.fingerprint.is_none());
}

#[test]
fn mixed_exports_are_aggregated_with_skips() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("instagram_posts.jsonl"),
        concat!(
            r#"{"ownerUsername":"a","caption":"CROOKS medusa chain is fire #grail","likesCount":120,"commentsCount":8}"#,
            "\n",
            "{not json\n",
            r#"{"ownerUsername":"b","caption":"box logo restock","likesCount":30,"commentsCount":1}"#,
            "\n",
        ),
    )
    .unwrap();
    fs::write(
        dir.path().join("tiktok.json"),
        r#"[{"authorMeta":{"name":"c"},"text":"crooks fit check","diggCount":500,"commentCount":20,"shareCount":4,"playCount":9000}]"#,
    )
    .unwrap();

    let brands = parse_brands(BRANDS).unwrap();
    let report = run_analysis(dir.path(), &brands.brands, AnalysisOptions::default()).unwrap();

    assert!(report.has_data);
    assert_eq!(report.summary.total_posts, 3);
    assert_eq!(report.dataset.files.len(), 2);
    assert_eq!(report.dataset.skipped_records, 1);
    assert!(report.dataset.fingerprint.is_some());

    let leader = &report.brands[0];
    assert_eq!(leader.brand_slug, "crooks-and-castles");
    assert_eq!(leader.mentions, 2);

    let md = render_markdown(&report);
    assert!(md.contains("## Brand Leaderboard"));
    assert!(md.contains("1 malformed records were skipped"));
}
