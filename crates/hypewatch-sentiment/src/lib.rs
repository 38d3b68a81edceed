//! Competitive-intelligence analysis for scraped social posts.
//!
//! Scores posts with a streetwear lexicon, buckets them by brand keyword,
//! counts hashtags, and folds everything into an [`IntelligenceReport`] in a
//! single pass. [`render_markdown`] turns a report into the shareable
//! write-up served by `reports/generate`.

pub mod aggregate;
pub mod brand_match;
pub mod error;
pub mod hashtags;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod types;

mod insights;

pub use aggregate::{analyze_dataset, analyze_posts, Aggregator};
pub use brand_match::{BrandEntry, BrandMatcher};
pub use error::AnalysisError;
pub use hashtags::HashtagCounter;
pub use pipeline::run_analysis;
pub use report::render_markdown;
pub use scorer::{lexicon_score, SentimentLabel};
pub use types::{
    AnalysisOptions, BrandMetrics, DatasetInfo, EngagementSummary, HashtagCount,
    IntelligenceReport, PlatformCount, SentimentBreakdown, TopPost,
};
