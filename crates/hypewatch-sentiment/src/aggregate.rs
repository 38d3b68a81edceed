//! Single-pass aggregation of posts into an [`IntelligenceReport`].

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use hypewatch_core::{Platform, Post};
use hypewatch_ingest::Dataset;

use crate::brand_match::BrandMatcher;
use crate::hashtags::HashtagCounter;
use crate::insights::derive_insights;
use crate::scorer::{lexicon_score, SentimentLabel};
use crate::types::{
    AnalysisOptions, BrandMetrics, DatasetInfo, EngagementSummary, IntelligenceReport,
    PlatformCount, SentimentBreakdown, TopPost,
};

const CAPTION_PREVIEW_CHARS: usize = 140;

#[derive(Debug, Default)]
struct BrandAccumulator {
    mentions: usize,
    engagement: u64,
    sentiment_sum: f64,
    hashtags: HashtagCounter,
}

/// Typed accumulator fed one post at a time.
#[derive(Debug)]
pub struct Aggregator<'m> {
    matcher: &'m BrandMatcher,
    options: AnalysisOptions,
    summary: EngagementSummary,
    authors: HashSet<String>,
    sentiment: SentimentBreakdown,
    sentiment_sum: f64,
    hashtags: HashtagCounter,
    platforms: BTreeMap<Platform, (usize, u64)>,
    brands: Vec<BrandAccumulator>,
    top_posts: Vec<TopPost>,
}

impl<'m> Aggregator<'m> {
    #[must_use]
    pub fn new(matcher: &'m BrandMatcher, options: AnalysisOptions) -> Self {
        let brands = matcher
            .entries()
            .iter()
            .map(|_| BrandAccumulator::default())
            .collect();
        Self {
            matcher,
            options,
            summary: EngagementSummary::default(),
            authors: HashSet::new(),
            sentiment: SentimentBreakdown::default(),
            sentiment_sum: 0.0,
            hashtags: HashtagCounter::new(),
            platforms: BTreeMap::new(),
            brands,
            top_posts: Vec::new(),
        }
    }

    /// Fold one post into the running totals.
    ///
    /// Returns `false` when the post was excluded by the brand filter.
    pub fn push(&mut self, post: &Post) -> bool {
        let text = post.searchable_text();
        let brand_hits = self.matcher.match_indices(&text);

        if let Some(filter) = &self.options.brand_filter {
            let entries = self.matcher.entries();
            if !brand_hits.iter().any(|&idx| entries[idx].slug == *filter) {
                return false;
            }
        }

        let engagement = post.engagement();
        let raw_score = lexicon_score(&text);
        let score = f64::from(raw_score);

        let summary = &mut self.summary;
        summary.total_posts += 1;
        summary.total_likes = summary.total_likes.saturating_add(post.likes_count);
        summary.total_comments = summary.total_comments.saturating_add(post.comments_count);
        summary.total_shares = summary.total_shares.saturating_add(post.shares_count);
        summary.total_views = summary.total_views.saturating_add(post.views_count);
        summary.total_engagement = summary.total_engagement.saturating_add(engagement);
        if let Some(ts) = post.timestamp {
            summary.earliest_post = Some(summary.earliest_post.map_or(ts, |e| e.min(ts)));
            summary.latest_post = Some(summary.latest_post.map_or(ts, |l| l.max(ts)));
        }
        if let Some(author) = &post.owner_username {
            self.authors.insert(author.to_lowercase());
        }

        match SentimentLabel::from_score(raw_score) {
            SentimentLabel::Positive => self.sentiment.positive += 1,
            SentimentLabel::Neutral => self.sentiment.neutral += 1,
            SentimentLabel::Negative => self.sentiment.negative += 1,
        }
        self.sentiment_sum += score;

        self.hashtags.add(&post.hashtags);

        let platform = self.platforms.entry(post.platform).or_insert((0, 0));
        platform.0 += 1;
        platform.1 = platform.1.saturating_add(engagement);

        for idx in brand_hits {
            let acc = &mut self.brands[idx];
            acc.mentions += 1;
            acc.engagement = acc.engagement.saturating_add(engagement);
            acc.sentiment_sum += score;
            acc.hashtags.add(&post.hashtags);
        }

        self.keep_top_post(post, engagement, score);
        true
    }

    fn keep_top_post(&mut self, post: &Post, engagement: u64, score: f64) {
        if self.options.top_posts == 0 {
            return;
        }
        let beats_last = self.top_posts.len() < self.options.top_posts
            || self
                .top_posts
                .last()
                .is_some_and(|last| engagement > last.engagement);
        if !beats_last {
            return;
        }

        let entry = TopPost {
            id: post.id.clone(),
            platform: post.platform,
            owner_username: post.owner_username.clone(),
            caption: preview(&post.caption),
            engagement,
            sentiment: round2(score),
            url: post.url.clone(),
            timestamp: post.timestamp,
        };
        // Insert after any equal-engagement entries so earlier posts win ties.
        let pos = self
            .top_posts
            .iter()
            .position(|p| p.engagement < engagement)
            .unwrap_or(self.top_posts.len());
        self.top_posts.insert(pos, entry);
        self.top_posts.truncate(self.options.top_posts);
    }

    /// Close the accumulator and build the report.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn finish(self, dataset: DatasetInfo) -> IntelligenceReport {
        let mut summary = self.summary;
        summary.unique_authors = self.authors.len();
        summary.avg_engagement = mean(summary.total_engagement as f64, summary.total_posts);

        let mut sentiment = self.sentiment;
        sentiment.avg_score = mean(self.sentiment_sum, summary.total_posts);

        let total_mentions: usize = self.brands.iter().map(|b| b.mentions).sum();
        let mut brands: Vec<BrandMetrics> = self
            .matcher
            .entries()
            .iter()
            .zip(self.brands)
            .map(|(entry, acc)| BrandMetrics {
                brand_name: entry.name.clone(),
                brand_slug: entry.slug.clone(),
                relationship: entry.relationship,
                tier: entry.tier,
                price_range: entry.price_range.clone(),
                mentions: acc.mentions,
                total_engagement: acc.engagement,
                avg_engagement: mean(acc.engagement as f64, acc.mentions),
                avg_sentiment: mean(acc.sentiment_sum, acc.mentions),
                share_of_voice: mean(acc.mentions as f64 * 100.0, total_mentions),
                top_hashtags: acc.hashtags.top(self.options.brand_top_hashtags),
            })
            .collect();
        brands.sort_by(|a, b| {
            b.mentions
                .cmp(&a.mentions)
                .then_with(|| a.brand_name.cmp(&b.brand_name))
        });

        let platforms = self
            .platforms
            .into_iter()
            .map(|(platform, (posts, engagement))| PlatformCount {
                platform,
                posts,
                engagement,
            })
            .collect();

        let mut report = IntelligenceReport {
            has_data: summary.total_posts > 0,
            generated_at: Utc::now(),
            dataset,
            summary,
            sentiment,
            top_hashtags: self.hashtags.top(self.options.top_hashtags),
            platforms,
            brands,
            top_posts: self.top_posts,
            insights: Vec::new(),
        };
        report.insights = derive_insights(&report);
        report
    }
}

/// Aggregate a slice of posts without dataset provenance.
#[must_use]
pub fn analyze_posts(
    posts: &[Post],
    matcher: &BrandMatcher,
    options: AnalysisOptions,
) -> IntelligenceReport {
    let mut aggregator = Aggregator::new(matcher, options);
    for post in posts {
        aggregator.push(post);
    }
    aggregator.finish(DatasetInfo::default())
}

/// Aggregate a loaded [`Dataset`], carrying its file counts and fingerprint.
#[must_use]
pub fn analyze_dataset(
    dataset: &Dataset,
    matcher: &BrandMatcher,
    options: AnalysisOptions,
) -> IntelligenceReport {
    let mut aggregator = Aggregator::new(matcher, options);
    for post in &dataset.posts {
        aggregator.push(post);
    }
    aggregator.finish(DatasetInfo {
        fingerprint: dataset.fingerprint.clone(),
        files: dataset.files.clone(),
        failed_files: dataset.failed_files.clone(),
        skipped_records: dataset.skipped_records(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round2(sum / count as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn preview(caption: &str) -> String {
    if caption.chars().count() <= CAPTION_PREVIEW_CHARS {
        return caption.to_string();
    }
    let mut cut: String = caption.chars().take(CAPTION_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
