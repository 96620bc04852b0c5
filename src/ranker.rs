// src/ranker.rs
//! # Composite Ranker
//! Orchestrates the per-topic pipeline: catalog search, per-candidate
//! scatter-gather (statistics + comments + scoring), and the final ordered
//! aggregation. Per-candidate failures shrink the result set; they never
//! surface to the caller. An empty result is a valid outcome.

use std::sync::Arc;

use metrics::{counter, gauge, histogram};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::catalog::types::{Candidate, CatalogSource, RankedResult};
use crate::catalog::{anon_hash, dev_logging_enabled, ensure_metrics_described};
use crate::config::{RankingConfig, RankingConfigHandle};
use crate::score::{engagement_score, filter_spam, sentiment_score};

/// Blend engagement and sentiment into one ranking value.
///
/// Sentiment is scaled x100 before blending so the [-1,1] signal stays
/// commensurable with engagement values that routinely run in the hundreds
/// or thousands. Suspicious items take the configured penalty multiplier.
pub fn composite_score(
    engagement: f64,
    sentiment: f64,
    suspicious: bool,
    cfg: &RankingConfig,
) -> f64 {
    let penalty = if suspicious {
        cfg.suspicion_penalty
    } else {
        1.0
    };
    penalty * (cfg.alpha * engagement + cfg.beta * (sentiment * 100.0))
}

pub struct Ranker {
    catalog: Arc<dyn CatalogSource>,
    config: RankingConfigHandle,
}

impl Ranker {
    pub fn new(catalog: Arc<dyn CatalogSource>, config: RankingConfigHandle) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &RankingConfigHandle {
        &self.config
    }

    /// Rank with the configured candidate bound.
    pub async fn rank(&self, topic: &str) -> Vec<RankedResult> {
        self.rank_with_limit(topic, None).await
    }

    /// Rank with an optional per-request candidate bound.
    pub async fn rank_with_limit(
        &self,
        topic: &str,
        max_results: Option<u32>,
    ) -> Vec<RankedResult> {
        ensure_metrics_described();
        counter!("rank_requests_total").increment(1);
        let t0 = std::time::Instant::now();

        let cfg = self.config.current();
        let limit = max_results.unwrap_or(cfg.max_results);

        // 1) Topic search. A failed search degrades to "no results".
        let candidates = match self.catalog.search(topic, limit).await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = ?e, source = self.catalog.name(), "catalog search failed");
                counter!("catalog_search_errors_total").increment(1);
                Vec::new()
            }
        };

        // 2) Fan out one fetch-and-score task per candidate. The set is
        // bounded by `limit`, which bounds outbound concurrency too.
        let mut tasks: JoinSet<(usize, Option<RankedResult>)> = JoinSet::new();
        let n = candidates.len();
        for (idx, cand) in candidates.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            tasks.spawn(async move {
                let scored = score_candidate(catalog, cand, cfg).await;
                (idx, scored)
            });
        }

        // 3) Join everything before ordering; partial results are not part
        // of the contract. Slots keep candidate (arrival) order.
        let mut slots: Vec<Option<RankedResult>> = vec![None; n];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, scored)) => slots[idx] = scored,
                Err(e) => {
                    warn!(error = ?e, "candidate task failed to join");
                }
            }
        }

        let mut results: Vec<RankedResult> = slots.into_iter().flatten().collect();

        // 4) Stable descending sort; ties keep arrival order.
        results.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));

        counter!("candidates_ranked_total").increment(results.len() as u64);
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("rank_duration_ms").record(ms);
        let now = chrono::Utc::now().timestamp().max(0) as f64;
        gauge!("rank_last_run_ts").set(now);

        if dev_logging_enabled() {
            info!(
                target: "ranker",
                topic_id = %anon_hash(topic),
                candidates = n,
                ranked = results.len(),
                "rank completed"
            );
        }

        results
    }
}

/// Independent fetch-and-score unit for one candidate. Returns `None` when
/// statistics are absent or errored; a comments failure only empties the
/// sample.
async fn score_candidate(
    catalog: Arc<dyn CatalogSource>,
    cand: Candidate,
    cfg: RankingConfig,
) -> Option<RankedResult> {
    let stats = match catalog.fetch_statistics(&cand.id).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            counter!("item_stats_missing_total").increment(1);
            return None;
        }
        Err(e) => {
            warn!(error = ?e, item = %cand.id, "statistics fetch failed");
            counter!("item_stats_errors_total").increment(1);
            return None;
        }
    };

    let comments = match catalog.fetch_comments(&cand.id, cfg.max_comments).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = ?e, item = %cand.id, "comment fetch failed; scoring without sample");
            counter!("comment_fetch_errors_total").increment(1);
            Vec::new()
        }
    };

    let kept = filter_spam(&comments);
    let dropped = comments.len().saturating_sub(kept.len());
    if dropped > 0 {
        counter!("comments_filtered_total").increment(dropped as u64);
    }

    let sentiment = sentiment_score(&kept);
    let engagement = engagement_score(&stats);
    let composite = composite_score(engagement, sentiment, stats.suspicious, &cfg);

    Some(RankedResult {
        id: stats.id,
        title: stats.title,
        engagement,
        sentiment,
        suspicious: stats.suspicious,
        composite_score: composite,
    })
}
