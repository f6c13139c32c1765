use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use espn_fetcher::FetcherConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file picked up from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "tracker.toml";

/// Top-level tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// SQLite database file
    pub database_path: String,

    /// Season the picks ledger is tracking
    pub season: i32,

    /// How many picks the contest allows over a season
    pub pick_budget: i64,

    /// Players shown by `rank` unless overridden
    pub display_limit: usize,

    /// Warn when the cache is older than this many days
    pub stale_warning_days: i64,

    /// ESPN fetcher configuration
    pub fetcher: FetcherConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_path: "pga_tracker.db".to_string(),
            season: Utc::now().year(),
            pick_budget: 200,
            display_limit: 50,
            stale_warning_days: 7,
            fetcher: FetcherConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration: explicit file, else `tracker.toml` if present,
    /// else defaults; environment variables override either way
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                let raw = std::fs::read_to_string(DEFAULT_CONFIG_FILE)
                    .context("Failed to read tracker.toml")?;
                toml::from_str(&raw).context("Failed to parse tracker.toml")?
            }
            None => Self::default(),
        };

        if let Ok(db) = std::env::var("PGA_TRACKER_DB") {
            config.database_path = db;
        }
        if let Ok(season) = std::env::var("PGA_TRACKER_SEASON") {
            if let Ok(season) = season.parse() {
                config.season = season;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.database_path, "pga_tracker.db");
        assert_eq!(config.pick_budget, 200);
        assert_eq!(config.display_limit, 50);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TrackerConfig = toml::from_str(
            r#"
            season = 2026
            pick_budget = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.season, 2026);
        assert_eq!(config.pick_budget, 40);
        assert_eq!(config.database_path, "pga_tracker.db");
        assert_eq!(config.fetcher.cache.ttl_hours, 24);
    }
}
