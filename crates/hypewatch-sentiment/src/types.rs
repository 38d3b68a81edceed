use chrono::{DateTime, Utc};
use hypewatch_core::{Platform, PriceRange, Relationship};
use hypewatch_ingest::{FailedFile, FileSummary};
use serde::Serialize;

/// Tunables for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// How many hashtags to report overall.
    pub top_hashtags: usize,
    /// How many hashtags to report per brand.
    pub brand_top_hashtags: usize,
    /// How many highest-engagement posts to keep.
    pub top_posts: usize,
    /// Only count posts that mention this brand slug.
    pub brand_filter: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_hashtags: 10,
            brand_top_hashtags: 5,
            top_posts: 5,
            brand_filter: None,
        }
    }
}

/// Aggregated view of one dataset, shaped for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct IntelligenceReport {
    /// `false` when no posts were loaded; every other field is then zeroed.
    pub has_data: bool,
    pub generated_at: DateTime<Utc>,
    pub dataset: DatasetInfo,
    pub summary: EngagementSummary,
    pub sentiment: SentimentBreakdown,
    pub top_hashtags: Vec<HashtagCount>,
    pub platforms: Vec<PlatformCount>,
    pub brands: Vec<BrandMetrics>,
    pub top_posts: Vec<TopPost>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetInfo {
    pub fingerprint: Option<String>,
    pub files: Vec<FileSummary>,
    pub failed_files: Vec<FailedFile>,
    pub skipped_records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub total_posts: usize,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_shares: u64,
    pub total_views: u64,
    pub total_engagement: u64,
    pub avg_engagement: f64,
    pub unique_authors: usize,
    pub earliest_post: Option<DateTime<Utc>>,
    pub latest_post: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Mean lexicon score across posts. `0.0` with no posts.
    pub avg_score: f64,
}

impl SentimentBreakdown {
    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagCount {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformCount {
    pub platform: Platform,
    pub posts: usize,
    pub engagement: u64,
}

/// Per-brand bucket metrics. Every configured brand appears, mentioned or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandMetrics {
    pub brand_name: String,
    pub brand_slug: String,
    pub relationship: Relationship,
    pub tier: u8,
    pub price_range: Option<PriceRange>,
    pub mentions: usize,
    pub total_engagement: u64,
    pub avg_engagement: f64,
    pub avg_sentiment: f64,
    /// Percentage of all brand mentions that went to this brand.
    pub share_of_voice: f64,
    pub top_hashtags: Vec<HashtagCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub id: Option<String>,
    pub platform: Platform,
    pub owner_username: Option<String>,
    /// Caption cut to a preview length.
    pub caption: String,
    pub engagement: u64,
    pub sentiment: f64,
    pub url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}
