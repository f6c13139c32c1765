//! PGA fantasy pick tracker CLI
//!
//! Subcommands cover the season loop: `refresh` the stat cache, `rank` the
//! current field, `pick` a player (locking them for the season), `result`
//! and `history` for bookkeeping, `status` for the weekly check, and a
//! confirmed `reset` to start a season over.

mod config;
mod display;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use config::TrackerConfig;
use espn_fetcher::{EspnFetcher, FetchEvent};
use pick_ledger::{LedgerError, NewPick, PickLedger};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;
use win_predictor::WinPredictor;

#[derive(Parser)]
#[command(name = "tracker-cli")]
#[command(about = "PGA fantasy pick tracker - rankings, picks, and season history")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./tracker.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank this week's field by win probability
    Rank {
        /// Include players already locked this season
        #[arg(short, long)]
        all: bool,

        /// Maximum players to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record a pick, locking the player for the rest of the season
    Pick {
        /// ESPN athlete ID (shown by `rank`)
        #[arg(short, long)]
        player: String,

        /// Week number of the pick
        #[arg(short, long)]
        week: i32,

        /// Tournament name; defaults to the current tournament
        #[arg(short, long)]
        tournament: Option<String>,
    },

    /// Show the season's picks with results and totals
    History,

    /// Attach a tournament result to an existing pick
    Result {
        /// ESPN athlete ID
        #[arg(short, long)]
        player: String,

        /// Final finish position
        #[arg(short, long)]
        finish: i32,

        /// Prize money won, in dollars
        #[arg(short, long)]
        earnings: f64,
    },

    /// Refresh the stat cache from ESPN
    Refresh,

    /// Cache freshness and season progress at a glance
    Status,

    /// Discard every pick and lock for a season
    Reset {
        /// Season to reset; defaults to the configured season
        #[arg(short, long)]
        season: Option<i32>,

        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = TrackerConfig::load(cli.config.as_deref())?;
    let ledger = PickLedger::open(&config.database_path).await?;

    match cli.command {
        Commands::Rank { all, limit } => cmd_rank(&config, &ledger, all, limit).await,
        Commands::Pick { player, week, tournament } => {
            cmd_pick(&config, &ledger, player, week, tournament).await
        }
        Commands::History => cmd_history(&config, &ledger).await,
        Commands::Result { player, finish, earnings } => {
            cmd_result(&config, &ledger, player, finish, earnings).await
        }
        Commands::Refresh => cmd_refresh(&config, &ledger).await,
        Commands::Status => cmd_status(&config, &ledger).await,
        Commands::Reset { season, yes } => cmd_reset(&config, &ledger, season, yes).await,
    }
}

async fn cmd_rank(
    config: &TrackerConfig,
    ledger: &PickLedger,
    all: bool,
    limit: Option<usize>,
) -> Result<()> {
    let field = ledger.field_stats().await?;
    if field.is_empty() {
        println!("No cached stats yet - run {} first.", "tracker-cli refresh".bold());
        return Ok(());
    }

    // The tournament header is a live lookup; ranking itself works offline.
    match EspnFetcher::new(config.fetcher.clone())?.current_tournament().await {
        Ok(Some(tournament)) => display::print_tournament_header(&tournament),
        Ok(None) => println!("{}", "No tournament on the schedule this week.".yellow()),
        Err(e) => warn!("Could not fetch tournament info: {}", e),
    }

    let now = Utc::now();
    if field.iter().any(|entry| entry.is_stale(now)) {
        display::print_stale_warning(ledger.last_refreshed().await?);
    }

    let stats: Vec<_> = field.iter().map(|entry| entry.stats.clone()).collect();
    let locked = ledger.locked_players(config.season).await?;
    let ranked = WinPredictor::new().rank_field(&stats, &locked);

    display::print_ranked_field(&ranked, limit.unwrap_or(config.display_limit), all);
    Ok(())
}

async fn cmd_pick(
    config: &TrackerConfig,
    ledger: &PickLedger,
    player_id: String,
    week: i32,
    tournament: Option<String>,
) -> Result<()> {
    let Some(cached) = ledger.cached_stats(&player_id).await? else {
        println!(
            "{} unknown player id {player_id} - run {} and use an id from {}",
            "ERROR:".red().bold(),
            "tracker-cli refresh".bold(),
            "tracker-cli rank".bold()
        );
        return Ok(());
    };

    let tournament_name = match tournament {
        Some(name) => name,
        None => {
            let fetched = EspnFetcher::new(config.fetcher.clone())?
                .current_tournament()
                .await
                .unwrap_or_else(|e| {
                    warn!("Could not fetch tournament info: {}", e);
                    None
                });
            fetched.map(|t| t.name).unwrap_or_else(|| "Unknown Tournament".to_string())
        }
    };

    let pick = NewPick {
        season: config.season,
        week,
        player_id: player_id.clone(),
        player_name: cached.stats.name.clone(),
        tournament_name,
    };

    match ledger.record_pick(&pick).await {
        Ok(record) => {
            println!(
                "{} {} locked in for {} (week {}, season {}).",
                "PICKED:".green().bold(),
                record.player_name,
                record.tournament_name,
                record.week,
                record.season
            );
        }
        Err(LedgerError::DuplicatePick { season, .. }) => {
            let prior = ledger
                .picks(season)
                .await?
                .into_iter()
                .find(|p| p.player_id == player_id);
            let detail = prior
                .map(|p| format!(" (used for {} in week {})", p.tournament_name, p.week))
                .unwrap_or_default();
            println!(
                "{} {} is already locked for season {}{}.",
                "REJECTED:".red().bold(),
                cached.stats.name,
                season,
                detail
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn cmd_history(config: &TrackerConfig, ledger: &PickLedger) -> Result<()> {
    let picks = ledger.picks(config.season).await?;
    let summary = ledger.season_summary(config.season).await?;
    display::print_history(&picks, &summary, config.pick_budget);
    Ok(())
}

async fn cmd_result(
    config: &TrackerConfig,
    ledger: &PickLedger,
    player_id: String,
    finish: i32,
    earnings: f64,
) -> Result<()> {
    match ledger.update_pick_result(config.season, &player_id, finish, earnings).await {
        Ok(()) => {
            println!(
                "Recorded finish {} and {} for player {}.",
                finish,
                display::format_money(earnings),
                player_id
            );
        }
        Err(LedgerError::PickNotFound { season, player_id }) => {
            println!(
                "{} no pick for player {} in season {}.",
                "ERROR:".red().bold(),
                player_id,
                season
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn cmd_refresh(config: &TrackerConfig, ledger: &PickLedger) -> Result<()> {
    let fetcher = EspnFetcher::new(config.fetcher.clone())?;

    match fetcher.refresh_stats(ledger).await? {
        FetchEvent::StatsRefreshed { tournament, count, .. } => {
            println!("{} {} players cached for {}.", "REFRESHED:".green().bold(), count, tournament);
        }
        FetchEvent::NoTournament { .. } => {
            println!("{}", "No current or upcoming tournament on the schedule.".yellow());
        }
        FetchEvent::FetchFailed { endpoint, error, .. } => {
            println!(
                "{} {} ({}). Previous cache kept.",
                "REFRESH FAILED:".red().bold(),
                error,
                endpoint
            );
        }
    }
    Ok(())
}

async fn cmd_status(config: &TrackerConfig, ledger: &PickLedger) -> Result<()> {
    let summary = ledger.season_summary(config.season).await?;
    let last_refreshed = ledger.last_refreshed().await?;

    let next_tournament = EspnFetcher::new(config.fetcher.clone())?
        .current_tournament()
        .await
        .unwrap_or_else(|e| {
            warn!("Could not fetch tournament info: {}", e);
            None
        });

    display::print_status(
        config.season,
        &summary,
        config.pick_budget,
        last_refreshed,
        config.stale_warning_days,
        next_tournament.as_ref(),
    );
    Ok(())
}

async fn cmd_reset(
    config: &TrackerConfig,
    ledger: &PickLedger,
    season: Option<i32>,
    yes: bool,
) -> Result<()> {
    let season = season.unwrap_or(config.season);
    let summary = ledger.season_summary(season).await?;

    if summary.picks_used == 0 {
        println!("Season {season} has no picks to discard.");
        return Ok(());
    }

    if !yes {
        println!(
            "{} this discards all {} picks and unlocks every player for season {}.",
            "WARNING:".yellow().bold(),
            summary.picks_used,
            season
        );
        print!("Type {} to confirm: ", "RESET".bold());
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if answer.trim() != "RESET" {
            println!("Aborted; nothing was changed.");
            return Ok(());
        }
    }

    let removed = ledger.reset_season(season).await?;
    println!("Season {season} reset: {removed} picks discarded.");
    Ok(())
}
