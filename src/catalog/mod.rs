// src/catalog/mod.rs
pub mod types;
pub mod youtube;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("rank_requests_total", "Ranking requests served.");
        describe_counter!(
            "catalog_search_errors_total",
            "Catalog search transport/parse errors."
        );
        describe_counter!(
            "item_stats_missing_total",
            "Candidates dropped because statistics were absent."
        );
        describe_counter!(
            "item_stats_errors_total",
            "Statistics fetch transport/parse errors."
        );
        describe_counter!(
            "comment_fetch_errors_total",
            "Comment fetch errors (candidate kept, empty sample)."
        );
        describe_counter!(
            "comments_filtered_total",
            "Comments dropped by the spam block-list."
        );
        describe_counter!(
            "candidates_ranked_total",
            "Candidates that produced a ranked result."
        );
        describe_histogram!("catalog_request_ms", "Catalog request time in milliseconds.");
        describe_histogram!("rank_duration_ms", "Full rank() time in milliseconds.");
        describe_gauge!("rank_last_run_ts", "Unix ts when rank() last completed.");
    });
}

/// Normalize a comment body: decode HTML entities, strip tags, collapse
/// whitespace, trim. Comment text reaches scoring as plain lower-casable
/// text regardless of how the catalog escaped it.
pub fn normalize_comment(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

// Dev logging gate: RANKER_DEV_LOG=1 AND dev env (debug build or APP_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("RANKER_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("APP_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

// Short anonymized id for free text. Raw topics/comments are never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_comment_decodes_and_collapses() {
        let s = "  <b>Great&nbsp;&nbsp;lesson</b>, thanks!  ";
        assert_eq!(normalize_comment(s), "Great lesson, thanks!");
    }

    #[test]
    fn normalize_comment_strips_tags_across_lines() {
        let s = "line one<br />\nline two";
        assert_eq!(normalize_comment(s), "line one line two");
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("rust ownership");
        let b = anon_hash("rust ownership");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }
}
