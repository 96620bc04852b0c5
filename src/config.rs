// src/config.rs
//! Ranking configuration: TOML file with env overrides, shared behind a
//! thread-safe handle so the admin reload endpoint can swap it at runtime.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

// --- env defaults & names ---
pub const DEFAULT_RANKING_CONFIG_PATH: &str = "config/ranking.toml";

pub const ENV_RANKING_CONFIG_PATH: &str = "RANKING_CONFIG_PATH";
pub const ENV_RANKING_ALPHA: &str = "RANKING_ALPHA";
pub const ENV_RANKING_BETA: &str = "RANKING_BETA";

/// Tunable ranking constants. The defaults are the contract: changing them
/// changes every composite score this service emits.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RankingConfig {
    /// Weight of the engagement signal in the composite blend.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Weight of the (x100 scaled) sentiment signal.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Multiplier applied to suspicious items.
    #[serde(default = "default_suspicion_penalty")]
    pub suspicion_penalty: f64,
    /// Candidate-set bound for topic search.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Comment-sample bound per candidate.
    #[serde(default = "default_max_comments")]
    pub max_comments: u32,
}

fn default_alpha() -> f64 {
    0.7
}
fn default_beta() -> f64 {
    0.3
}
fn default_suspicion_penalty() -> f64 {
    0.5
}
fn default_max_results() -> u32 {
    5
}
fn default_max_comments() -> u32 {
    50
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            suspicion_penalty: default_suspicion_penalty(),
            max_results: default_max_results(),
            max_comments: default_max_comments(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RankingRoot {
    ranking: RankingConfig,
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_weight_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

impl RankingConfig {
    /// Parse from a TOML string (`[ranking]` table).
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let root: RankingRoot = toml::from_str(toml_str).context("parsing ranking config toml")?;
        Ok(root.ranking)
    }

    /// Load using `RANKING_CONFIG_PATH` or the default path. A missing file
    /// yields defaults; a present-but-broken file is an error, since silently
    /// ranking with defaults would mask an operator mistake.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_RANKING_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_RANKING_CONFIG_PATH));

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading ranking config at {}", path.display()))?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };

        if let Some(a) = parse_weight_env(std::env::var(ENV_RANKING_ALPHA).ok()) {
            cfg.alpha = a;
        }
        if let Some(b) = parse_weight_env(std::env::var(ENV_RANKING_BETA).ok()) {
            cfg.beta = b;
        }
        Ok(cfg)
    }
}

/// Thread-safe shared handle; `reload` re-runs the load path in place.
#[derive(Clone)]
pub struct RankingConfigHandle {
    inner: Arc<RwLock<RankingConfig>>,
}

impl RankingConfigHandle {
    pub fn new(cfg: RankingConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cfg)),
        }
    }

    pub fn current(&self) -> RankingConfig {
        self.inner
            .read()
            .map(|g| *g)
            .unwrap_or_default()
    }

    /// Re-read config from disk/env and swap it in. Returns the new value.
    pub fn reload(&self) -> Result<RankingConfig> {
        let fresh = RankingConfig::load()?;
        if let Ok(mut guard) = self.inner.write() {
            *guard = fresh;
        }
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn defaults_match_the_contract() {
        let c = RankingConfig::default();
        assert_eq!(c.alpha, 0.7);
        assert_eq!(c.beta, 0.3);
        assert_eq!(c.suspicion_penalty, 0.5);
        assert_eq!(c.max_results, 5);
        assert_eq!(c.max_comments, 50);
    }

    #[test]
    fn partial_toml_falls_back_per_field() {
        let c = RankingConfig::from_toml_str("[ranking]\nalpha = 0.6\n").unwrap();
        assert_eq!(c.alpha, 0.6);
        assert_eq!(c.beta, 0.3);
        assert_eq!(c.max_results, 5);
    }

    #[test]
    fn broken_toml_is_an_error() {
        assert!(RankingConfig::from_toml_str("[ranking]\nalpha = \"high\"\n").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn load_honors_env_path_and_weight_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ranking.toml");
        std::fs::write(&path, "[ranking]\nalpha = 0.9\nbeta = 0.1\nmax_results = 8\n").unwrap();

        env::set_var(ENV_RANKING_CONFIG_PATH, path.display().to_string());
        env::remove_var(ENV_RANKING_ALPHA);
        env::set_var(ENV_RANKING_BETA, "0.25");

        let c = RankingConfig::load().unwrap();
        assert_eq!(c.alpha, 0.9);
        assert_eq!(c.beta, 0.25); // env wins over file
        assert_eq!(c.max_results, 8);

        env::remove_var(ENV_RANKING_CONFIG_PATH);
        env::remove_var(ENV_RANKING_BETA);
    }

    #[serial_test::serial]
    #[test]
    fn load_without_file_yields_defaults() {
        env::set_var(
            ENV_RANKING_CONFIG_PATH,
            "/nonexistent/ranking-config.toml",
        );
        env::remove_var(ENV_RANKING_ALPHA);
        env::remove_var(ENV_RANKING_BETA);
        let c = RankingConfig::load().unwrap();
        assert_eq!(c, RankingConfig::default());
        env::remove_var(ENV_RANKING_CONFIG_PATH);
    }

    #[test]
    fn weight_env_parse_clamps() {
        assert_eq!(parse_weight_env(Some("1.5".into())), Some(1.0));
        assert_eq!(parse_weight_env(Some("-0.2".into())), Some(0.0));
        assert_eq!(parse_weight_env(Some("abc".into())), None);
        assert_eq!(parse_weight_env(None), None);
    }
}
