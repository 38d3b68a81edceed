use std::collections::HashMap;

use crate::types::HashtagCount;

/// Frequency counter for hashtags.
#[derive(Debug, Clone, Default)]
pub struct HashtagCounter {
    counts: HashMap<String, u64>,
}

impl HashtagCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count each tag once. Tags are expected lowercase and without `#`.
    pub fn add<S: AsRef<str>>(&mut self, tags: &[S]) {
        for tag in tags {
            let tag = tag.as_ref();
            if tag.is_empty() {
                continue;
            }
            *self.counts.entry(tag.to_owned()).or_insert(0) += 1;
        }
    }

    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// The `n` most frequent tags, by count descending then tag ascending.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<HashtagCount> {
        let mut all: Vec<HashtagCount> = self
            .counts
            .iter()
            .map(|(tag, count)| HashtagCount {
                tag: tag.clone(),
                count: *count,
            })
            .collect();
        all.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        all.truncate(n);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_orders_by_count_then_tag() {
        let mut counter = HashtagCounter::new();
        counter.add(&["streetwear", "crooks", "ootd"]);
        counter.add(&["streetwear", "ootd"]);
        counter.add(&["streetwear", "bape"]);

        let top = counter.top(3);
        let tags: Vec<_> = top.iter().map(|h| (h.tag.as_str(), h.count)).collect();
        assert_eq!(tags, vec![("streetwear", 3), ("ootd", 2), ("bape", 1)]);
    }

    #[test]
    fn top_with_large_n_returns_all() {
        let mut counter = HashtagCounter::new();
        counter.add(&["a", "b"]);
        assert_eq!(counter.top(100).len(), 2);
        assert_eq!(counter.distinct(), 2);
    }

    #[test]
    fn empty_tags_are_ignored() {
        let mut counter = HashtagCounter::new();
        counter.add(&["", "x"]);
        assert_eq!(counter.distinct(), 1);
    }

    #[test]
    fn top_zero_is_empty() {
        let mut counter = HashtagCounter::new();
        counter.add(&["x"]);
        assert!(counter.top(0).is_empty());
    }
}
