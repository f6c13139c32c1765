use serde::{Deserialize, Serialize};

/// Configuration for the ESPN fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// ESPN endpoint configuration
    pub espn: EspnConfig,

    /// Stat cache configuration
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspnConfig {
    /// Scoreboard endpoint (current and scheduled tournaments)
    pub scoreboard_url: String,

    /// Season statistics endpoint (rankings, earnings, strokes gained)
    pub statistics_url: String,

    /// Per-athlete event log endpoint; `{athlete_id}` is substituted
    pub event_log_url: String,

    /// World-ranking HTML page used when the JSON feed has no OWGR data
    pub rankings_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long cached stats stay fresh, in hours
    pub ttl_hours: i64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            espn: EspnConfig {
                scoreboard_url: "https://site.api.espn.com/apis/site/v2/sports/golf/pga/scoreboard"
                    .to_string(),
                statistics_url: "https://site.api.espn.com/apis/site/v2/sports/golf/pga/statistics"
                    .to_string(),
                event_log_url:
                    "https://site.web.api.espn.com/apis/common/v3/sports/golf/pga/athletes/{athlete_id}/eventlog"
                        .to_string(),
                rankings_url: "https://www.espn.com/golf/rankings".to_string(),
                timeout_secs: 10,
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                    .to_string(),
            },
            cache: CacheConfig { ttl_hours: 24 },
        }
    }
}

impl FetcherConfig {
    /// Load configuration, applying environment overrides to the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ESPN_SCOREBOARD_URL") {
            config.espn.scoreboard_url = url;
        }
        if let Ok(url) = std::env::var("ESPN_STATISTICS_URL") {
            config.espn.statistics_url = url;
        }
        if let Ok(hours) = std::env::var("PGA_TRACKER_CACHE_HOURS") {
            if let Ok(hours) = hours.parse() {
                config.cache.ttl_hours = hours;
            }
        }

        config
    }

    /// Event log URL for a specific athlete
    pub fn event_log_url_for(&self, athlete_id: &str) -> String {
        self.espn.event_log_url.replace("{athlete_id}", athlete_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert!(config.espn.scoreboard_url.contains("scoreboard"));
        assert_eq!(config.cache.ttl_hours, 24);
    }

    #[test]
    fn test_event_log_url_substitution() {
        let config = FetcherConfig::default();
        let url = config.event_log_url_for("9478");
        assert!(url.contains("/athletes/9478/"));
        assert!(!url.contains("{athlete_id}"));
    }
}
