// src/catalog/types.rs
use anyhow::Result;

/// A video item returned by a topic search, not yet scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub title: String,
}

/// Popularity counters for one catalog item. `suspicious` is computed
/// locally from the counters, never retrieved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStatistics {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comment_count: u64,
    pub suspicious: bool,
}

/// One scored entry of the final ranking. Serialized as-is to the UI.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RankedResult {
    pub id: String,
    pub title: String,
    pub engagement: f64,
    pub sentiment: f64,
    pub suspicious: bool,
    pub composite_score: f64,
}

/// Seam to the external video catalog. The production implementation talks
/// to the hosted API; tests plug in mocks.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Topic search; returns up to `max_results` candidates.
    async fn search(&self, topic: &str, max_results: u32) -> Result<Vec<Candidate>>;

    /// Popularity counters for one item. `Ok(None)` means the item is gone
    /// (deleted, private, malformed payload) and must not be scored.
    async fn fetch_statistics(&self, id: &str) -> Result<Option<ItemStatistics>>;

    /// Up to `max_comments` top-level comment bodies, in catalog order.
    async fn fetch_comments(&self, id: &str, max_comments: u32) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}
