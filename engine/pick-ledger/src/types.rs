use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use win_predictor::PlayerStats;

/// A pick-selection request: one player, one week, one tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPick {
    /// Season year (e.g., 2026)
    pub season: i32,
    /// Week number within the season
    pub week: i32,
    /// ESPN athlete ID
    pub player_id: String,
    /// Player name, stored for display
    pub player_name: String,
    /// Tournament the pick applies to
    pub tournament_name: String,
}

/// One row of the append-only picks ledger
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PickRecord {
    pub id: i64,
    pub season: i32,
    pub week: i32,
    pub player_id: String,
    pub player_name: String,
    pub tournament_name: String,
    /// Final position once the tournament is over; NULL until then
    pub finish_position: Option<i32>,
    /// Prize money realized by the pick, in dollars
    pub earnings: f64,
    pub picked_at: DateTime<Utc>,
}

/// A stat-cache entry with its freshness window
#[derive(Debug, Clone)]
pub struct CachedStats {
    pub stats: PlayerStats,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedStats {
    /// Whether the entry has outlived its freshness window
    ///
    /// Stale entries are still served (the prior refresh remains the best
    /// data available); callers surface a warning instead of failing.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Season-to-date totals over the picks ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season: i32,
    pub picks_used: i64,
    pub total_earnings: f64,
}
