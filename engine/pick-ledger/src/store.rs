use crate::error::{LedgerError, Result};
use crate::types::{CachedStats, NewPick, PickRecord, SeasonSummary};
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use win_predictor::{Availability, PlayerStats};

/// SQLite-backed store for picks, the season lock set, and cached stats
///
/// Single-user, so the pool is pinned to one connection; every multi-table
/// write runs inside a transaction on that connection.
pub struct PickLedger {
    pool: SqlitePool,
}

impl PickLedger {
    /// Open (or create) the ledger database at the given path
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let ledger = Self { pool };
        ledger.init_schema().await?;

        info!("Opened pick ledger at {:?}", path.as_ref());
        Ok(ledger)
    }

    /// Open an in-memory ledger; used by tests and dry runs
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);

        // One connection, kept alive for the pool's lifetime: each sqlite
        // in-memory connection is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let ledger = Self { pool };
        ledger.init_schema().await?;
        Ok(ledger)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS picks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                player_id TEXT NOT NULL,
                player_name TEXT NOT NULL,
                tournament_name TEXT NOT NULL,
                finish_position INTEGER,
                earnings REAL NOT NULL DEFAULT 0,
                picked_at TEXT NOT NULL,
                UNIQUE (season, player_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS locked_players (
                season INTEGER NOT NULL,
                player_id TEXT NOT NULL,
                tournament_name TEXT NOT NULL,
                locked_at TEXT NOT NULL,
                PRIMARY KEY (season, player_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stat_cache (
                player_id TEXT PRIMARY KEY,
                stats_json TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a pick and lock the player for the season, atomically
    ///
    /// Rejects with `DuplicatePick` when the player is already locked; the
    /// transaction guarantees the ledger row and the lock-set entry land
    /// together or not at all.
    pub async fn record_pick(&self, pick: &NewPick) -> Result<PickRecord> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query("SELECT 1 FROM locked_players WHERE season = ?1 AND player_id = ?2")
            .bind(pick.season)
            .bind(&pick.player_id)
            .fetch_optional(&mut *tx)
            .await?;

        if locked.is_some() {
            return Err(LedgerError::DuplicatePick {
                season: pick.season,
                player_id: pick.player_id.clone(),
            });
        }

        let picked_at = Utc::now();
        let insert = sqlx::query(
            r#"
            INSERT INTO picks (season, week, player_id, player_name, tournament_name, earnings, picked_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
            "#,
        )
        .bind(pick.season)
        .bind(pick.week)
        .bind(&pick.player_id)
        .bind(&pick.player_name)
        .bind(&pick.tournament_name)
        .bind(picked_at)
        .execute(&mut *tx)
        .await;

        let inserted = match insert {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => {
                return Err(LedgerError::DuplicatePick {
                    season: pick.season,
                    player_id: pick.player_id.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        sqlx::query(
            r#"
            INSERT INTO locked_players (season, player_id, tournament_name, locked_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(pick.season)
        .bind(&pick.player_id)
        .bind(&pick.tournament_name)
        .bind(picked_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Recorded pick: {} ({}) for {} in week {} of season {}",
            pick.player_name, pick.player_id, pick.tournament_name, pick.week, pick.season
        );

        Ok(PickRecord {
            id: inserted.last_insert_rowid(),
            season: pick.season,
            week: pick.week,
            player_id: pick.player_id.clone(),
            player_name: pick.player_name.clone(),
            tournament_name: pick.tournament_name.clone(),
            finish_position: None,
            earnings: 0.0,
            picked_at,
        })
    }

    /// Whether the player is locked for the season
    pub async fn is_locked(&self, season: i32, player_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM locked_players WHERE season = ?1 AND player_id = ?2")
            .bind(season)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Lock state of the player for the season
    pub async fn availability(&self, season: i32, player_id: &str) -> Result<Availability> {
        Ok(if self.is_locked(season, player_id).await? {
            Availability::Locked
        } else {
            Availability::Available
        })
    }

    /// The full lock set for a season, for O(1) availability checks
    pub async fn locked_players(&self, season: i32) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT player_id FROM locked_players WHERE season = ?1")
            .bind(season)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get::<String, _>("player_id")).collect())
    }

    /// All picks for a season, in pick order
    pub async fn picks(&self, season: i32) -> Result<Vec<PickRecord>> {
        let picks = sqlx::query_as::<_, PickRecord>(
            r#"
            SELECT id, season, week, player_id, player_name, tournament_name,
                   finish_position, earnings, picked_at
            FROM picks
            WHERE season = ?1
            ORDER BY week, picked_at
            "#,
        )
        .bind(season)
        .fetch_all(&self.pool)
        .await?;

        Ok(picks)
    }

    /// Attach a tournament result to an existing pick
    pub async fn update_pick_result(
        &self,
        season: i32,
        player_id: &str,
        finish_position: i32,
        earnings: f64,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE picks
            SET finish_position = ?1, earnings = ?2
            WHERE season = ?3 AND player_id = ?4
            "#,
        )
        .bind(finish_position)
        .bind(earnings)
        .bind(season)
        .bind(player_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::PickNotFound { season, player_id: player_id.to_string() });
        }

        info!(
            "Updated result for {} in season {}: finish {}, ${:.0}",
            player_id, season, finish_position, earnings
        );
        Ok(())
    }

    /// Season-to-date pick count and earnings
    pub async fn season_summary(&self, season: i32) -> Result<SeasonSummary> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS picks_used, COALESCE(SUM(earnings), 0) AS total_earnings
             FROM picks WHERE season = ?1",
        )
        .bind(season)
        .fetch_one(&self.pool)
        .await?;

        Ok(SeasonSummary {
            season,
            picks_used: row.get("picks_used"),
            total_earnings: row.get("total_earnings"),
        })
    }

    /// Delete every pick and lock for the season
    ///
    /// Destructive and season-wide; callers are expected to confirm with
    /// the user first. Returns the number of picks discarded.
    pub async fn reset_season(&self, season: i32) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let picks = sqlx::query("DELETE FROM picks WHERE season = ?1")
            .bind(season)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM locked_players WHERE season = ?1")
            .bind(season)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        warn!("Season {} reset: {} picks discarded", season, picks.rows_affected());
        Ok(picks.rows_affected())
    }

    /// Replace the stat cache wholesale with a fresh batch
    ///
    /// Runs in one transaction, so a failed refresh leaves the previous
    /// cache intact. Returns the number of players cached.
    pub async fn cache_stats(&self, stats: &[PlayerStats], ttl: Duration) -> Result<usize> {
        let fetched_at = Utc::now();
        let expires_at = fetched_at + ttl;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM stat_cache").execute(&mut *tx).await?;

        for player in stats {
            let stats_json = serde_json::to_string(player)?;
            sqlx::query(
                "INSERT INTO stat_cache (player_id, stats_json, fetched_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&player.player_id)
            .bind(stats_json)
            .bind(fetched_at)
            .bind(expires_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!("Cached stats for {} players, expiring {}", stats.len(), expires_at);
        Ok(stats.len())
    }

    /// Cached stats for one player, if any
    pub async fn cached_stats(&self, player_id: &str) -> Result<Option<CachedStats>> {
        let row = sqlx::query(
            "SELECT stats_json, fetched_at, expires_at FROM stat_cache WHERE player_id = ?1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_cache_row).transpose()
    }

    /// Every cached stat record, i.e. the current tournament field
    pub async fn field_stats(&self) -> Result<Vec<CachedStats>> {
        let rows = sqlx::query("SELECT stats_json, fetched_at, expires_at FROM stat_cache")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(decode_cache_row).collect()
    }

    /// When the cache was last refreshed, if ever
    pub async fn last_refreshed(&self) -> Result<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT MAX(fetched_at) AS fetched_at FROM stat_cache")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<Option<DateTime<Utc>>, _>("fetched_at"))
    }
}

fn decode_cache_row(row: sqlx::sqlite::SqliteRow) -> Result<CachedStats> {
    let stats_json: String = row.get("stats_json");
    Ok(CachedStats {
        stats: serde_json::from_str(&stats_json)?,
        fetched_at: row.get("fetched_at"),
        expires_at: row.get("expires_at"),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation))
}
