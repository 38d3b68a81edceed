//! Streetwear lexicon scorer for social captions.

use serde::Serialize;

/// Domain-specific word weights.
///
/// Keys are lowercase single words matched as whole tokens, so `"fit"` does
/// not fire inside `"outfit"`. Values in `(0.0, 1.0]` are positive, in
/// `[-1.0, 0.0)` negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("fire", 0.5),
    ("heat", 0.4),
    ("grail", 0.5),
    ("clean", 0.3),
    ("fresh", 0.3),
    ("dope", 0.4),
    ("hard", 0.2),
    ("love", 0.5),
    ("loved", 0.5),
    ("obsessed", 0.5),
    ("best", 0.5),
    ("amazing", 0.5),
    ("quality", 0.3),
    ("comfy", 0.3),
    ("legit", 0.3),
    ("drip", 0.3),
    ("fit", 0.2),
    ("cop", 0.3),
    ("copped", 0.4),
    ("goat", 0.5),
    ("iconic", 0.4),
    ("classic", 0.3),
    ("hype", 0.2),
    ("want", 0.2),
    ("need", 0.2),
    // Negative signals
    ("trash", -0.6),
    ("mid", -0.4),
    ("overpriced", -0.5),
    ("fake", -0.6),
    ("cheap", -0.3),
    ("ugly", -0.5),
    ("flop", -0.5),
    ("boring", -0.4),
    ("scam", -0.7),
    ("refund", -0.4),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("worst", -0.6),
    ("bad", -0.4),
    ("hate", -0.5),
    ("dead", -0.4),
    ("cringe", -0.4),
    ("shrunk", -0.4),
    ("late", -0.2),
    ("delayed", -0.3),
    ("sold-out", -0.1),
    ("resell", -0.1),
];

/// Scores within this distance of zero are neutral.
const NEUTRAL_BAND: f32 = 0.05;

/// Tokens that flip the polarity of the next lexicon hit. Apostrophes are
/// removed before lookup. `"no"` is left out: `"no cap"` means the opposite.
const NEGATORS: &[&str] = &[
    "not", "never", "aint", "isnt", "wasnt", "arent", "dont", "doesnt", "didnt", "cant", "wont",
];

/// Tokens after a negator that can still be flipped (`"not that fire"`).
const NEGATION_REACH: usize = 2;

fn normalize_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
        .trim_matches('-')
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .flat_map(char::to_lowercase)
        .collect()
}

fn weight_of(token: &str) -> Option<f32> {
    LEXICON
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, weight)| weight)
}

/// Score caption text against the streetwear lexicon.
///
/// Tokens are whitespace-split, stripped of surrounding punctuation and
/// lowercased, then matched whole. A negator within `NEGATION_REACH`
/// tokens flips the next hit. The sum is clamped to `[-1.0, 1.0]`; text
/// with no hits scores `0.0`.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    let mut negation_left = 0usize;

    for token in text.split_whitespace().map(normalize_token) {
        if token.is_empty() {
            continue;
        }
        if NEGATORS.contains(&token.as_str()) {
            negation_left = NEGATION_REACH;
            continue;
        }
        match weight_of(&token) {
            Some(weight) if negation_left > 0 => {
                score -= weight;
                negation_left = 0;
            }
            Some(weight) => score += weight,
            None => negation_left = negation_left.saturating_sub(1),
        }
    }

    score.clamp(-1.0, 1.0)
}

/// Coarse sentiment bucket derived from a lexicon score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score > NEUTRAL_BAND {
            SentimentLabel::Positive
        } else if score < -NEUTRAL_BAND {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}
