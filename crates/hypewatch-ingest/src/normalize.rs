//! Normalization from raw scraper records to [`hypewatch_core::Post`].
//!
//! ## Observed export shapes
//!
//! - Instagram (Apify `instagram-scraper`): `caption`, `hashtags: [String]`,
//!   `likesCount`, `commentsCount`, `videoViewCount`, `ownerUsername`,
//!   `timestamp` (RFC 3339), `url`, `shortCode`.
//! - TikTok (Apify `tiktok-scraper`): `text`, `hashtags: [{ "name": .. }]`,
//!   `diggCount`, `commentCount`, `shareCount`, `playCount` (sometimes nested
//!   under `stats`), `authorMeta.name`, `createTimeISO` or `createTime`
//!   (epoch seconds), `webVideoUrl`.
//! - Twitter exports: `full_text` / `text`, `favorite_count`, `reply_count`,
//!   `retweet_count`, `user.screen_name`, `created_at` in the legacy
//!   `"Wed Oct 10 20:19:24 +0000 2018"` format.
//!
//! Every field is optional. Any non-empty object is a post; only `{}` is
//! rejected.

use hypewatch_core::{Platform, Post};
use serde_json::{Map, Value};

use crate::parse_helpers::{
    extract_caption_hashtags, first_present, value_as_count, value_as_string, value_as_timestamp,
};

const CAPTION_FIELDS: &[&str] = &["caption", "text", "desc", "full_text", "description"];
const LIKES_FIELDS: &[&str] = &[
    "likesCount",
    "diggCount",
    "likes",
    "favorite_count",
    "like_count",
    "stats.diggCount",
];
const COMMENTS_FIELDS: &[&str] = &[
    "commentsCount",
    "commentCount",
    "comments",
    "reply_count",
    "stats.commentCount",
];
const SHARES_FIELDS: &[&str] = &["shareCount", "shares", "retweet_count", "stats.shareCount"];
const VIEWS_FIELDS: &[&str] = &["videoViewCount", "playCount", "views", "stats.playCount"];
const OWNER_FIELDS: &[&str] = &[
    "ownerUsername",
    "authorMeta.name",
    "author.username",
    "author.uniqueId",
    "user.screen_name",
    "username",
];
const TIMESTAMP_FIELDS: &[&str] = &[
    "timestamp",
    "createTimeISO",
    "created_at",
    "createTime",
    "taken_at",
];
const ID_FIELDS: &[&str] = &["id", "shortCode", "id_str", "postId"];
const URL_FIELDS: &[&str] = &["url", "webVideoUrl", "postUrl", "permalink"];

/// Normalize one raw record into a [`Post`].
///
/// `source_file` is recorded on the post and used as a last-resort platform
/// hint (`instagram_posts.jsonl`, `tiktok-2024.json`, ...).
///
/// Returns `None` only for an empty object.
#[must_use]
pub fn normalize_record(record: &Map<String, Value>, source_file: Option<&str>) -> Option<Post> {
    if record.is_empty() {
        return None;
    }

    let caption_value = first_present(record, CAPTION_FIELDS);
    let likes_value = first_present(record, LIKES_FIELDS);
    let comments_value = first_present(record, COMMENTS_FIELDS);
    let shares_value = first_present(record, SHARES_FIELDS);
    let views_value = first_present(record, VIEWS_FIELDS);
    let hashtags_value = record.get("hashtags").filter(|v| !v.is_null());
    let id_value = first_present(record, ID_FIELDS);

    let caption = caption_value.and_then(value_as_string).unwrap_or_default();
    let count = |v: Option<&Value>| v.and_then(value_as_count).unwrap_or(0);

    let mut hashtags = hashtags_value.map(explicit_hashtags).unwrap_or_default();
    hashtags.extend(extract_caption_hashtags(&caption));
    let hashtags = dedupe_in_order(hashtags);

    Some(Post {
        id: id_value.and_then(value_as_string),
        platform: detect_platform(record, source_file),
        owner_username: first_present(record, OWNER_FIELDS).and_then(value_as_string),
        caption,
        hashtags,
        likes_count: count(likes_value),
        comments_count: count(comments_value),
        shares_count: count(shares_value),
        views_count: count(views_value),
        timestamp: first_present(record, TIMESTAMP_FIELDS).and_then(value_as_timestamp),
        url: first_present(record, URL_FIELDS).and_then(value_as_string),
        source_file: source_file.map(ToOwned::to_owned),
    })
}

/// Hashtags from an explicit `hashtags` field: strings or `{ "name": .. }` objects.
fn explicit_hashtags(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        // Some exports flatten to a space/comma separated string.
        return value
            .as_str()
            .map(|s| {
                s.split(|c: char| c == ',' || c.is_whitespace())
                    .filter_map(clean_tag)
                    .collect()
            })
            .unwrap_or_default();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => clean_tag(s),
            Value::Object(obj) => obj
                .get("name")
                .or_else(|| obj.get("title"))
                .and_then(Value::as_str)
                .and_then(clean_tag),
            _ => None,
        })
        .collect()
}

fn clean_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_start_matches('#').trim().to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

fn dedupe_in_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn detect_platform(record: &Map<String, Value>, source_file: Option<&str>) -> Platform {
    if let Some(label) = record.get("platform").and_then(Value::as_str) {
        let platform = Platform::from_label(label);
        if platform != Platform::Unknown {
            return platform;
        }
    }

    let has = |key: &str| record.contains_key(key);
    if has("diggCount") || has("authorMeta") || has("webVideoUrl") || has("playCount") {
        return Platform::Tiktok;
    }
    if has("ownerUsername") || has("shortCode") || has("likesCount") {
        return Platform::Instagram;
    }
    if has("retweet_count") || has("full_text") || has("favorite_count") {
        return Platform::Twitter;
    }

    source_file.map_or(Platform::Unknown, platform_from_file_name)
}

fn platform_from_file_name(name: &str) -> Platform {
    let lower = name.to_lowercase();
    if lower.contains("tiktok") {
        Platform::Tiktok
    } else if lower.contains("instagram") || lower.contains("insta") {
        Platform::Instagram
    } else if lower.contains("twitter") || lower.contains("tweets") {
        Platform::Twitter
    } else {
        Platform::Unknown
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
