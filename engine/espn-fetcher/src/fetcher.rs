use crate::config::FetcherConfig;
use crate::models::{EventLog, FetchEvent, Scoreboard, StatisticsPage, Tournament};
use crate::normalize;
use crate::rankings::{self, WorldRanking};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use pick_ledger::PickLedger;
use reqwest::Client;
use std::time::Duration as StdDuration;
use tracing::{error, info, warn};
use win_predictor::PlayerStats;

/// ESPN golf data fetcher
pub struct EspnFetcher {
    config: FetcherConfig,
    client: Client,
}

impl EspnFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.espn.timeout_secs))
            .user_agent(&config.espn.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// Fetch the PGA Tour scoreboard
    pub async fn fetch_scoreboard(&self) -> Result<Scoreboard> {
        let url = &self.config.espn.scoreboard_url;
        info!("Fetching scoreboard from: {}", url);

        let response =
            self.client.get(url).send().await.context("Failed to fetch scoreboard")?;

        if !response.status().is_success() {
            anyhow::bail!("Scoreboard request failed with status: {}", response.status());
        }

        response.json().await.context("Failed to parse scoreboard JSON")
    }

    /// Fetch the season statistics page
    pub async fn fetch_statistics(&self) -> Result<StatisticsPage> {
        let url = &self.config.espn.statistics_url;
        info!("Fetching season statistics from: {}", url);

        let response =
            self.client.get(url).send().await.context("Failed to fetch season statistics")?;

        if !response.status().is_success() {
            anyhow::bail!("Statistics request failed with status: {}", response.status());
        }

        response.json().await.context("Failed to parse statistics JSON")
    }

    /// Fetch one athlete's event log
    pub async fn fetch_event_log(&self, athlete_id: &str) -> Result<EventLog> {
        let url = self.config.event_log_url_for(athlete_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch event log for athlete {athlete_id}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Event log request failed with status: {}", response.status());
        }

        response.json().await.context("Failed to parse event log JSON")
    }

    /// Fetch and parse the world-ranking HTML fallback
    pub async fn fetch_world_rankings(&self) -> Result<Vec<WorldRanking>> {
        let url = &self.config.espn.rankings_url;
        info!("Fetching world rankings from: {}", url);

        let response =
            self.client.get(url).send().await.context("Failed to fetch rankings page")?;

        if !response.status().is_success() {
            anyhow::bail!("Rankings request failed with status: {}", response.status());
        }

        let html = response.text().await.context("Failed to read rankings page body")?;
        rankings::parse_rankings_table(&html)
    }

    /// This week's tournament: the active scoreboard event, or the next
    /// calendar entry when the tour is between events
    pub async fn current_tournament(&self) -> Result<Option<Tournament>> {
        let scoreboard = self.fetch_scoreboard().await?;

        if let Some(event) = normalize::active_event(&scoreboard) {
            return Ok(Some(normalize::tournament_from_event(event)));
        }

        Ok(normalize::next_calendar_tournament(&scoreboard, Utc::now().date_naive()))
    }

    /// Assemble fresh stats for the current tournament field
    ///
    /// Hard failure on the scoreboard or statistics feed aborts the whole
    /// collection (the caller keeps its old cache); per-athlete event logs
    /// and the rankings fallback degrade to warnings.
    pub async fn collect_field_stats(&self) -> Result<Option<(Tournament, Vec<PlayerStats>)>> {
        let scoreboard = self.fetch_scoreboard().await?;

        let Some(event) = normalize::active_event(&scoreboard) else {
            return Ok(None);
        };
        let tournament = normalize::tournament_from_event(event);
        let mut field = normalize::field_from_event(event);

        if field.is_empty() {
            warn!("Tournament {} has no field on the scoreboard yet", tournament.name);
            return Ok(Some((tournament, field)));
        }

        let statistics = self.fetch_statistics().await?;
        normalize::apply_statistics(&mut field, &statistics);

        if field.iter().all(|p| p.world_rank.is_none()) {
            match self.fetch_world_rankings().await {
                Ok(rankings) => normalize::apply_world_rankings(&mut field, &rankings),
                Err(e) => warn!("World-ranking fallback failed: {}", e),
            }
        }

        for player in &mut field {
            match self.fetch_event_log(&player.player_id).await {
                Ok(log) => normalize::apply_event_log(player, &log, &tournament.course),
                Err(e) => {
                    warn!("Failed to fetch event log for {}: {}", player.name, e);
                }
            }
        }

        info!("Collected stats for {} players in {}", field.len(), tournament.name);
        Ok(Some((tournament, field)))
    }

    /// Run a full refresh cycle into the ledger's stat cache
    pub async fn refresh_stats(&self, ledger: &PickLedger) -> Result<FetchEvent> {
        info!("Starting stat refresh");

        match self.collect_field_stats().await {
            Ok(Some((tournament, field))) => {
                let ttl = Duration::hours(self.config.cache.ttl_hours);
                let count = ledger.cache_stats(&field, ttl).await?;

                info!("Refreshed stat cache: {} players for {}", count, tournament.name);
                Ok(FetchEvent::StatsRefreshed {
                    tournament: tournament.name,
                    count,
                    timestamp: Utc::now(),
                })
            }
            Ok(None) => {
                warn!("No current or upcoming tournament on the schedule");
                Ok(FetchEvent::NoTournament { timestamp: Utc::now() })
            }
            Err(e) => {
                error!("Stat refresh failed, keeping previous cache: {}", e);
                Ok(FetchEvent::FetchFailed {
                    endpoint: "scoreboard/statistics".to_string(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                })
            }
        }
    }
}
