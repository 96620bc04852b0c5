// src/score/engagement.rs
//! Engagement magnitude from popularity counters.
//!
//! `(views / 1000 + likes + comments) / 3`. Views are down-weighted 1000x
//! because view counts run 1-3 orders of magnitude above likes/comments;
//! the divisor is a fixed design constant.

use crate::catalog::types::ItemStatistics;

pub fn engagement_score(stats: &ItemStatistics) -> f64 {
    (stats.views as f64 / 1000.0 + stats.likes as f64 + stats.comment_count as f64) / 3.0
}
