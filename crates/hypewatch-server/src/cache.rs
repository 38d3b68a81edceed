//! In-memory cache of the latest [`IntelligenceReport`].
//!
//! Loading walks the data directory with blocking file I/O, so every refresh
//! runs on the blocking pool. Readers always see a complete report: the
//! cached `Arc` is swapped only after a new one is fully built.

use std::path::PathBuf;
use std::sync::Arc;

use hypewatch_core::BrandConfig;
use hypewatch_sentiment::{analyze_posts, AnalysisOptions, BrandMatcher, IntelligenceReport};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone)]
pub struct ReportCache {
    data_dir: PathBuf,
    brands: Arc<Vec<BrandConfig>>,
    options: AnalysisOptions,
    current: Arc<RwLock<Arc<IntelligenceReport>>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl ReportCache {
    /// Start with the "no data" report until the first refresh completes.
    #[must_use]
    pub fn new(data_dir: PathBuf, brands: Vec<BrandConfig>, options: AnalysisOptions) -> Self {
        let empty = analyze_posts(&[], &BrandMatcher::new(&brands), options.clone());
        Self {
            data_dir,
            brands: Arc::new(brands),
            options,
            current: Arc::new(RwLock::new(Arc::new(empty))),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn current(&self) -> Arc<IntelligenceReport> {
        Arc::clone(&*self.current.read().await)
    }

    /// Reload the data directory and replace the cached report.
    ///
    /// Concurrent refreshes are serialized; the cached report is left as-is
    /// when loading fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be listed or the
    /// blocking task panics.
    pub async fn refresh(&self) -> anyhow::Result<Arc<IntelligenceReport>> {
        let _guard = self.refresh_lock.lock().await;

        let data_dir = self.data_dir.clone();
        let brands = Arc::clone(&self.brands);
        let options = self.options.clone();
        let report = tokio::task::spawn_blocking(move || {
            hypewatch_sentiment::run_analysis(&data_dir, &brands, options)
        })
        .await??;

        let report = Arc::new(report);
        *self.current.write().await = Arc::clone(&report);
        tracing::info!(
            posts = report.summary.total_posts,
            has_data = report.has_data,
            fingerprint = report.dataset.fingerprint.as_deref().unwrap_or("none"),
            "report cache refreshed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypewatch_core::Relationship;

    fn roster() -> Vec<BrandConfig> {
        vec![BrandConfig {
            name: "Crooks & Castles".into(),
            relationship: Relationship::Own,
            tier: 2,
            keywords: vec!["crooks".into()],
            price_range: None,
            notes: None,
        }]
    }

    #[tokio::test]
    async fn starts_with_no_data_report() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::new(dir.path().to_path_buf(), roster(), AnalysisOptions::default());
        let report = cache.current().await;
        assert!(!report.has_data);
        assert_eq!(report.brands.len(), 1);
    }

    #[tokio::test]
    async fn refresh_picks_up_new_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::new(dir.path().to_path_buf(), roster(), AnalysisOptions::default());

        std::fs::write(
            dir.path().join("posts.jsonl"),
            "{\"caption\":\"CROOKS tee\",\"likesCount\":3}\n",
        )
        .unwrap();
        let refreshed = cache.refresh().await.unwrap();

        assert!(refreshed.has_data);
        assert_eq!(cache.current().await.summary.total_posts, 1);
        assert_eq!(cache.current().await.brands[0].mentions, 1);
    }
}
