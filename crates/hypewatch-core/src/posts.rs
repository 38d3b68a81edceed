use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Social platform a scraped post came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
    Twitter,
    Unknown,
}

impl Platform {
    /// Parse a platform label leniently (`"IG"`, `"x"`, `"TikTok"` ...).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "instagram" | "ig" | "insta" => Platform::Instagram,
            "tiktok" | "tik_tok" | "tt" => Platform::Tiktok,
            "twitter" | "x" | "tweet" => Platform::Twitter,
            _ => Platform::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scraped social post, normalized from whatever shape the scraper emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<String>,
    pub platform: Platform,
    pub owner_username: Option<String>,
    pub caption: String,
    /// Lowercase, without the leading `#`, deduplicated in first-seen order.
    pub hashtags: Vec<String>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub shares_count: u64,
    pub views_count: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: Option<String>,
    /// File name the record was loaded from.
    pub source_file: Option<String>,
}

impl Post {
    /// Likes + comments + shares. Views are reach, not engagement.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.likes_count
            .saturating_add(self.comments_count)
            .saturating_add(self.shares_count)
    }

    /// Caption and hashtags joined for keyword matching.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut text = self.caption.clone();
        for tag in &self.hashtags {
            text.push_str(" #");
            text.push_str(tag);
        }
        text
    }
}
