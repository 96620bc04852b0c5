// src/score/spam.rs
//! Promotional-comment filter.
//!
//! A comment is dropped when its lower-cased text contains any block-list
//! phrase as a plain substring. The match is deliberately not word-boundary
//! aware: embedded hits (e.g. "unsubscribed") also drop the comment, which
//! is the defined behavior of this heuristic, false positives included.

use once_cell::sync::Lazy;

static BLOCKLIST: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "subscribe",
        "like",
        "follow",
        "click here",
        "buy now",
        "free money",
        "win cash",
    ]
});

/// Returns true when the comment trips the block-list.
pub fn is_spam(comment: &str) -> bool {
    let lower = comment.to_lowercase();
    BLOCKLIST.iter().any(|phrase| lower.contains(phrase))
}

/// Keep only non-promotional comments, preserving input order.
pub fn filter_spam(comments: &[String]) -> Vec<String> {
    comments
        .iter()
        .filter(|c| !is_spam(c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_blocklisted_phrases_case_insensitively() {
        let comments = v(&[
            "Really helpful walkthrough",
            "SUBSCRIBE to my channel!!",
            "Click HERE for the answer key",
            "buy now while it lasts",
        ]);
        let kept = filter_spam(&comments);
        assert_eq!(kept, v(&["Really helpful walkthrough"]));
    }

    #[test]
    fn substring_matches_drop_embedded_hits() {
        // "unlikely" contains "like"; the heuristic drops it on purpose.
        let comments = v(&["an unlikely explanation", "plain comment"]);
        let kept = filter_spam(&comments);
        assert_eq!(kept, v(&["plain comment"]));
    }

    #[test]
    fn multi_word_phrases_must_appear_whole() {
        let comments = v(&["click somewhere here", "free lunch, no money down"]);
        // Neither contains "click here" / "free money" contiguously.
        assert_eq!(filter_spam(&comments), comments);
    }

    #[test]
    fn order_is_preserved_for_survivors() {
        let comments = v(&["first", "subscribe", "second", "third"]);
        assert_eq!(filter_spam(&comments), v(&["first", "second", "third"]));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(filter_spam(&[]).is_empty());
    }
}
