// src/catalog/youtube.rs
//! Hosted video catalog client (YouTube Data API v3 shape).
//!
//! Three read-only endpoints: topic search, per-item statistics, per-item
//! top-level comments. All requests are keyed; the key comes from the
//! environment at construction time so a missing credential fails startup
//! instead of masquerading as "no results".

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;
use std::time::Duration;

use crate::catalog::normalize_comment;
use crate::catalog::types::{Candidate, CatalogSource, ItemStatistics};
use crate::score::suspicion;

pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeCatalog {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeCatalog {
    /// Build from environment. Fails if `YOUTUBE_API_KEY` is unset/empty;
    /// this is the one configuration error the service surfaces to the
    /// operator.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(anyhow!(
                "{} is not set; the catalog client cannot authenticate",
                ENV_API_KEY
            ));
        }
        let base_url =
            std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(api_key, base_url))
    }

    /// Explicit constructor; `base_url` override is how integration tests
    /// point the client at a local stub.
    pub fn new(api_key: String, base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("study-video-ranker/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

// Response mapping. Counters arrive as decimal strings; absent or
// unparseable counters count as 0.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<Snippet>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay")]
    text_display: Option<String>,
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

#[async_trait]
impl CatalogSource for YouTubeCatalog {
    async fn search(&self, topic: &str, max_results: u32) -> Result<Vec<Candidate>> {
        let t0 = std::time::Instant::now();

        let url = format!("{}/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", topic),
                ("type", "video"),
                ("maxResults", &max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .context("catalog search request")?;

        if !resp.status().is_success() {
            return Err(anyhow!("catalog search returned {}", resp.status()));
        }
        let body: SearchResponse = resp.json().await.context("parsing catalog search json")?;

        let mut out = Vec::with_capacity(body.items.len());
        for it in body.items {
            let id = it.id.and_then(|i| i.video_id);
            let title = it.snippet.and_then(|s| s.title);
            // Items without a video id or title can't be ranked; skip them.
            if let (Some(id), Some(title)) = (id, title) {
                out.push(Candidate { id, title });
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("catalog_request_ms").record(ms);

        Ok(out)
    }

    async fn fetch_statistics(&self, id: &str) -> Result<Option<ItemStatistics>> {
        let t0 = std::time::Instant::now();

        let url = format!("{}/videos", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", id),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .context("statistics request")?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("catalog_request_ms").record(ms);

        // Deleted/private items and access errors all mean "absent": the
        // candidate is dropped, never scored with defaults.
        if !resp.status().is_success() {
            tracing::debug!(item = id, status = %resp.status(), "statistics unavailable");
            return Ok(None);
        }
        let body: VideosResponse = match resp.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(item = id, error = ?e, "malformed statistics payload");
                return Ok(None);
            }
        };
        let Some(item) = body.items.into_iter().next() else {
            return Ok(None);
        };

        let title = item
            .snippet
            .and_then(|s| s.title)
            .unwrap_or_else(|| id.to_string());
        let stats = item.statistics.unwrap_or(VideoStatistics {
            view_count: None,
            like_count: None,
            comment_count: None,
        });
        let views = parse_count(stats.view_count.as_deref());
        let likes = parse_count(stats.like_count.as_deref());
        let comment_count = parse_count(stats.comment_count.as_deref());

        Ok(Some(ItemStatistics {
            id: id.to_string(),
            title,
            views,
            likes,
            comment_count,
            suspicious: suspicion::is_suspicious(views, likes),
        }))
    }

    async fn fetch_comments(&self, id: &str, max_comments: u32) -> Result<Vec<String>> {
        let t0 = std::time::Instant::now();

        let url = format!("{}/commentThreads", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("videoId", id),
                ("maxResults", &max_comments.to_string()),
                ("textFormat", "plainText"),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .context("comment threads request")?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("catalog_request_ms").record(ms);

        if !resp.status().is_success() {
            return Err(anyhow!("comment threads returned {}", resp.status()));
        }
        let body: CommentThreadsResponse =
            resp.json().await.context("parsing comment threads json")?;

        let mut out = Vec::with_capacity(body.items.len());
        for thread in body.items {
            let text = thread
                .snippet
                .and_then(|s| s.top_level_comment)
                .and_then(|c| c.snippet)
                .and_then(|s| s.text_display);
            if let Some(text) = text {
                let norm = normalize_comment(&text);
                if !norm.is_empty() {
                    out.push(norm);
                }
            }
            if out.len() as u32 >= max_comments {
                break;
            }
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "YouTube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_defaults_to_zero() {
        assert_eq!(parse_count(Some("123")), 123);
        assert_eq!(parse_count(Some(" 7 ")), 7);
        assert_eq!(parse_count(Some("n/a")), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn search_items_without_id_or_title_are_skipped() {
        let raw = r#"{
            "items": [
                {"id": {"videoId": "abc"}, "snippet": {"title": "Intro to Rust"}},
                {"id": {}, "snippet": {"title": "No id"}},
                {"id": {"videoId": "def"}}
            ]
        }"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        let kept: Vec<_> = body
            .items
            .into_iter()
            .filter_map(|it| {
                let id = it.id.and_then(|i| i.video_id)?;
                let title = it.snippet.and_then(|s| s.title)?;
                Some((id, title))
            })
            .collect();
        assert_eq!(kept, vec![("abc".to_string(), "Intro to Rust".to_string())]);
    }

    #[test]
    fn statistics_counters_parse_from_strings() {
        let raw = r#"{
            "items": [{
                "snippet": {"title": "Intro to Rust"},
                "statistics": {"viewCount": "500000", "likeCount": "10000"}
            }]
        }"#;
        let body: VideosResponse = serde_json::from_str(raw).unwrap();
        let item = body.items.into_iter().next().unwrap();
        let stats = item.statistics.unwrap();
        assert_eq!(parse_count(stats.view_count.as_deref()), 500_000);
        assert_eq!(parse_count(stats.like_count.as_deref()), 10_000);
        assert_eq!(parse_count(stats.comment_count.as_deref()), 0);
    }
}
