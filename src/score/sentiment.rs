// src/score/sentiment.rs
//! Keyword-polarity sentiment over a comment sample.
//!
//! Per comment, each polarity keyword found as a case-insensitive substring
//! increments its counter once; a single comment can hit several keywords
//! and both polarities. The score is `(pos - neg) / (pos + neg)`, which is
//! bounded to [-1, 1] by construction. No tokenization or stemming: the
//! substring semantics are the contract, not an approximation of one.

use once_cell::sync::Lazy;

static POSITIVE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "good",
        "great",
        "excellent",
        "amazing",
        "love",
        "awesome",
        "fantastic",
        "wonderful",
        "perfect",
        "best",
    ]
});

static NEGATIVE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "bad",
        "terrible",
        "awful",
        "hate",
        "worst",
        "horrible",
        "disappointing",
        "boring",
        "stupid",
        "useless",
    ]
});

/// Polarity counts for one comment sample.
fn count_hits(comments: &[String]) -> (u32, u32) {
    let mut pos = 0u32;
    let mut neg = 0u32;
    for comment in comments {
        let lower = comment.to_lowercase();
        for kw in POSITIVE.iter() {
            if lower.contains(kw) {
                pos += 1;
            }
        }
        for kw in NEGATIVE.iter() {
            if lower.contains(kw) {
                neg += 1;
            }
        }
    }
    (pos, neg)
}

/// Bounded sentiment in [-1, 1]; exactly 0 for an empty sample or a sample
/// with no keyword hits.
pub fn sentiment_score(comments: &[String]) -> f64 {
    let (pos, neg) = count_hits(comments);
    let total = pos + neg;
    if total == 0 {
        return 0.0;
    }
    (pos as f64 - neg as f64) / (total as f64)
}
