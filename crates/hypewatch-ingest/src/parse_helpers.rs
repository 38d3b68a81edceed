//! Lenient field coercions shared by record normalization.
//!
//! Scraper exports disagree on types: counts arrive as numbers, numeric
//! strings (`"1,204"`) or abbreviated strings (`"1.2K"`), and timestamps as
//! RFC 3339, Twitter's legacy format, or unix epochs.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::{Map, Value};

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\p{L}\p{N}_]+)").expect("valid regex"));

/// Epoch values above this are taken to be milliseconds (≈ year 33658 in seconds).
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Extract `#hashtags` from free text, lowercased, without the `#`.
///
/// Duplicates are kept; callers dedupe when merging.
#[must_use]
pub fn extract_caption_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Resolve a dotted path (`"stats.diggCount"`) inside a JSON object.
pub(crate) fn lookup_path<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// First non-null value among `paths`.
pub(crate) fn first_present<'a>(
    record: &'a Map<String, Value>,
    paths: &[&str],
) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|p| lookup_path(record, p))
        .find(|v| !v.is_null())
}

/// Coerce a JSON value into a non-negative count.
///
/// Negative numbers clamp to zero; non-numeric strings yield `None`.
pub(crate) fn value_as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u)
            } else if n.as_i64().is_some() {
                Some(0)
            } else {
                n.as_f64().map(float_to_count)
            }
        }
        Value::String(s) => parse_count_str(s),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse `"1,204"`, `"980"`, `"1.2K"`, `"3.4m"`, `"2B"`.
fn parse_count_str(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }

    let (number, multiplier) = match cleaned.chars().last() {
        Some('k' | 'K') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some('m' | 'M') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        Some('b' | 'B') => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    if multiplier == 1.0 {
        if let Ok(u) = number.parse::<u64>() {
            return Some(u);
        }
    }

    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| float_to_count(f * multiplier))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(f: f64) -> u64 {
    if f.is_nan() || f <= 0.0 {
        0
    } else {
        f.round() as u64
    }
}

/// Coerce a JSON value into a UTC timestamp.
pub(crate) fn value_as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(epoch_to_datetime),
        Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

fn epoch_to_datetime(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(epoch).single()
    } else {
        Utc.timestamp_opt(epoch, 0).single()
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Twitter v1.1: "Wed Oct 10 20:19:24 +0000 2018"
    if let Ok(dt) = DateTime::parse_from_str(s, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    s.parse::<i64>().ok().and_then(epoch_to_datetime)
}

/// Coerce a JSON value into a non-empty trimmed string.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn hashtags_are_lowercased_without_hash() {
        assert_eq!(
            extract_caption_hashtags("Fresh #Medusa drop #streetwear_la #LA2024!"),
            vec!["medusa", "streetwear_la", "la2024"]
        );
    }

    #[test]
    fn hashtags_handle_unicode() {
        assert_eq!(extract_caption_hashtags("#stüssy fit"), vec!["stüssy"]);
    }

    #[test]
    fn lone_hash_is_not_a_hashtag() {
        assert!(extract_caption_hashtags("we're # 1").is_empty());
    }

    #[test]
    fn lookup_path_walks_nested_objects() {
        let value = json!({ "stats": { "diggCount": 42 } });
        let map = value.as_object().unwrap();
        assert_eq!(lookup_path(map, "stats.diggCount"), Some(&json!(42)));
        assert_eq!(lookup_path(map, "stats.missing"), None);
        assert_eq!(lookup_path(map, "missing.diggCount"), None);
    }

    #[test]
    fn first_present_skips_nulls() {
        let value = json!({ "likesCount": null, "likes": 7 });
        let map = value.as_object().unwrap();
        assert_eq!(
            first_present(map, &["likesCount", "likes"]),
            Some(&json!(7))
        );
    }

    #[test]
    fn counts_from_numbers() {
        assert_eq!(value_as_count(&json!(12)), Some(12));
        assert_eq!(value_as_count(&json!(-3)), Some(0));
        assert_eq!(value_as_count(&json!(4.6)), Some(5));
    }

    #[test]
    fn counts_from_strings() {
        assert_eq!(value_as_count(&json!("1,204")), Some(1204));
        assert_eq!(value_as_count(&json!("1.2K")), Some(1200));
        assert_eq!(value_as_count(&json!("3.4m")), Some(3_400_000));
        assert_eq!(value_as_count(&json!("lots")), None);
        assert_eq!(value_as_count(&json!("")), None);
    }

    #[test]
    fn counts_reject_non_scalars() {
        assert_eq!(value_as_count(&json!(true)), None);
        assert_eq!(value_as_count(&json!([1])), None);
    }

    #[test]
    fn timestamp_rfc3339() {
        let ts = value_as_timestamp(&json!("2024-03-01T12:00:00.000Z")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn timestamp_twitter_legacy() {
        let ts = value_as_timestamp(&json!("Wed Oct 10 20:19:24 +0000 2018")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2018-10-10T20:19:24+00:00");
    }

    #[test]
    fn timestamp_naive_is_utc() {
        let ts = value_as_timestamp(&json!("2024-03-01 08:30:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T08:30:00+00:00");
    }

    #[test]
    fn timestamp_epoch_seconds_and_millis() {
        let secs = value_as_timestamp(&json!(1_700_000_000)).unwrap();
        let millis = value_as_timestamp(&json!(1_700_000_000_000_i64)).unwrap();
        assert_eq!(secs, millis);
        assert_eq!(
            value_as_timestamp(&json!("1700000000")).unwrap(),
            secs
        );
    }

    #[test]
    fn timestamp_garbage_is_none() {
        assert!(value_as_timestamp(&json!("yesterday")).is_none());
        assert!(value_as_timestamp(&json!(null)).is_none());
    }

    #[test]
    fn strings_are_trimmed_and_non_empty() {
        assert_eq!(value_as_string(&json!("  hi ")), Some("hi".to_string()));
        assert_eq!(value_as_string(&json!("   ")), None);
        assert_eq!(value_as_string(&json!(123)), Some("123".to_string()));
    }
}
