//! Keyword bucketing of posts into brands.
//!
//! Matching is case-insensitive substring containment: a caption containing
//! `"CROOKS"` lands in the Crooks & Castles bucket exactly as `"crooks"` does.
//! A post may land in several buckets.

use hypewatch_core::{BrandConfig, PriceRange, Relationship};

/// One brand bucket with its precomputed, lowercased match terms.
#[derive(Debug, Clone)]
pub struct BrandEntry {
    pub name: String,
    pub slug: String,
    pub relationship: Relationship,
    pub tier: u8,
    pub price_range: Option<PriceRange>,
    terms: Vec<String>,
}

impl BrandEntry {
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn matches_lower(&self, lower_text: &str) -> bool {
        self.terms.iter().any(|term| lower_text.contains(term.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrandMatcher {
    entries: Vec<BrandEntry>,
}

impl BrandMatcher {
    #[must_use]
    pub fn new(brands: &[BrandConfig]) -> Self {
        let entries = brands
            .iter()
            .map(|b| BrandEntry {
                name: b.name.clone(),
                slug: b.slug(),
                relationship: b.relationship,
                tier: b.tier,
                price_range: b.price_range.clone(),
                terms: b.match_terms(),
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[BrandEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices into [`Self::entries`] of every brand mentioned in `text`.
    #[must_use]
    pub fn match_indices(&self, text: &str) -> Vec<usize> {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches_lower(&lower))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Every brand mentioned in `text`, in roster order.
    #[must_use]
    pub fn matches(&self, text: &str) -> Vec<&BrandEntry> {
        self.match_indices(text)
            .into_iter()
            .map(|idx| &self.entries[idx])
            .collect()
    }

    /// Whether `text` mentions the brand with `slug`.
    #[must_use]
    pub fn mentions(&self, slug: &str, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .any(|entry| entry.slug == slug && entry.matches_lower(&lower))
    }

    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&BrandEntry> {
        self.entries.iter().find(|entry| entry.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<BrandConfig> {
        vec![
            BrandConfig {
                name: "Crooks & Castles".into(),
                relationship: Relationship::Own,
                tier: 2,
                keywords: vec!["crooks".into(), "medusa chain".into()],
                price_range: None,
                notes: None,
            },
            BrandConfig {
                name: "Supreme".into(),
                relationship: Relationship::Competitor,
                tier: 1,
                keywords: vec!["box logo".into()],
                price_range: None,
                notes: None,
            },
            BrandConfig {
                name: "BAPE".into(),
                relationship: Relationship::Competitor,
                tier: 1,
                keywords: vec!["a bathing ape".into()],
                price_range: None,
                notes: None,
            },
        ]
    }

    #[test]
    fn uppercase_caption_matches_lowercase_keyword() {
        let matcher = BrandMatcher::new(&roster());
        let hits = matcher.matches("CROOKS FOREVER");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Crooks & Castles");
    }

    #[test]
    fn lowercase_caption_matches_same_bucket() {
        let matcher = BrandMatcher::new(&roster());
        assert_eq!(matcher.matches("crooks forever")[0].slug, "crooks-and-castles");
    }

    #[test]
    fn multi_word_keyword_matches() {
        let matcher = BrandMatcher::new(&roster());
        assert_eq!(matcher.matches("Iced out Medusa Chain")[0].slug, "crooks-and-castles");
        assert_eq!(matcher.matches("the red Box Logo tee")[0].slug, "supreme");
    }

    #[test]
    fn brand_name_is_an_implicit_keyword() {
        let matcher = BrandMatcher::new(&roster());
        assert_eq!(matcher.matches("new Bape drop")[0].slug, "bape");
    }

    #[test]
    fn matching_is_substring_containment() {
        let matcher = BrandMatcher::new(&roster());
        assert_eq!(matcher.matches("#crooksandcastles")[0].slug, "crooks-and-castles");
    }

    #[test]
    fn post_can_hit_several_buckets() {
        let matcher = BrandMatcher::new(&roster());
        let slugs: Vec<_> = matcher
            .matches("Supreme vs Crooks, who did it better?")
            .into_iter()
            .map(|e| e.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["crooks-and-castles", "supreme"]);
    }

    #[test]
    fn no_match_is_empty() {
        let matcher = BrandMatcher::new(&roster());
        assert!(matcher.matches("plain white tee").is_empty());
    }

    #[test]
    fn mentions_checks_single_slug() {
        let matcher = BrandMatcher::new(&roster());
        assert!(matcher.mentions("supreme", "SUPREME"));
        assert!(!matcher.mentions("bape", "SUPREME"));
        assert!(!matcher.mentions("unknown", "SUPREME"));
    }

    #[test]
    fn empty_roster_matches_nothing() {
        let matcher = BrandMatcher::new(&[]);
        assert!(matcher.is_empty());
        assert!(matcher.matches("crooks").is_empty());
    }
}
