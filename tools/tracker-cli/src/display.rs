//! Terminal rendering for tracker output

use chrono::{DateTime, Utc};
use colored::*;
use espn_fetcher::Tournament;
use pick_ledger::{PickRecord, SeasonSummary};
use win_predictor::{Availability, RankedPlayer};

pub fn print_tournament_header(tournament: &Tournament) {
    println!();
    println!("{}", tournament.name.bold().green());
    println!("  Dates:  {}", tournament.dates);
    println!("  Course: {}", tournament.course);
    if let Some(purse) = &tournament.purse {
        println!("  Purse:  {}", purse);
    }
    println!();
}

pub fn print_stale_warning(last_refreshed: Option<DateTime<Utc>>) {
    let age = last_refreshed
        .map(|ts| format!("last refreshed {}", ts.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_else(|| "never refreshed".to_string());
    println!("{} cached stats are stale ({age}) - run `tracker-cli refresh`", "WARNING:".yellow().bold());
    println!();
}

/// Ranked field table; locked players render dimmed and unselectable
pub fn print_ranked_field(ranked: &[RankedPlayer], limit: usize, show_locked: bool) {
    let header = format!(
        "{:<4} {:<26} {:>8} {:>7} {:>7}  {}",
        "#", "PLAYER", "WIN%", "VALUE", "FEDEX", "STATUS"
    );
    println!("{}", header.bold());

    let mut shown = 0;
    for (index, player) in ranked.iter().enumerate() {
        if !show_locked && !player.availability.is_available() {
            continue;
        }
        if shown >= limit {
            break;
        }
        shown += 1;

        let fedex = player
            .fedex_rank
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".to_string());
        let row = format!(
            "{:<4} {:<26} {:>8.1} {:>7.2} {:>7}  {}",
            index + 1,
            truncate(&player.name, 26),
            player.win_probability,
            player.value_score,
            fedex,
            player.availability
        );

        match player.availability {
            Availability::Available => println!("{row}"),
            Availability::Locked => println!("{}", row.dimmed()),
        }
    }

    if shown == 0 {
        println!("{}", "(no players to show)".dimmed());
    }
}

pub fn print_history(picks: &[PickRecord], summary: &SeasonSummary, pick_budget: i64) {
    if picks.is_empty() {
        println!("No picks recorded for season {} yet.", summary.season);
        return;
    }

    println!("{}", format!("Season {} picks", summary.season).bold());
    let header = format!(
        "{:<5} {:<26} {:<30} {:>7} {:>12}",
        "WEEK", "PLAYER", "TOURNAMENT", "FINISH", "EARNINGS"
    );
    println!("{}", header.bold());

    for pick in picks {
        let finish = pick
            .finish_position
            .map(|pos| pos.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<26} {:<30} {:>7} {:>12}",
            pick.week,
            truncate(&pick.player_name, 26),
            truncate(&pick.tournament_name, 30),
            finish,
            format_money(pick.earnings)
        );
    }

    println!();
    println!("Total earnings: {}", format_money(summary.total_earnings).green().bold());
    println!(
        "Picks used: {} / {} ({} remaining)",
        summary.picks_used,
        pick_budget,
        pick_budget - summary.picks_used
    );
}

pub fn print_status(
    season: i32,
    summary: &SeasonSummary,
    pick_budget: i64,
    last_refreshed: Option<DateTime<Utc>>,
    stale_warning_days: i64,
    next_tournament: Option<&Tournament>,
) {
    println!("{}", format!("Season {season} status").bold());

    match last_refreshed {
        Some(ts) => {
            let days = (Utc::now() - ts).num_days();
            let line = format!("Stats last refreshed: {} ({} days ago)", ts.format("%Y-%m-%d %H:%M UTC"), days);
            if days > stale_warning_days {
                println!("{}", line.yellow());
                println!("{} results may be missing - run `tracker-cli refresh`", "WARNING:".yellow().bold());
            } else {
                println!("{line}");
            }
        }
        None => println!("{}", "Stats never refreshed - run `tracker-cli refresh`".yellow()),
    }

    println!(
        "Picks used: {} / {} ({} remaining)",
        summary.picks_used,
        pick_budget,
        pick_budget - summary.picks_used
    );
    println!("Season earnings: {}", format_money(summary.total_earnings));

    if let Some(tournament) = next_tournament {
        println!("This week: {} ({})", tournament.name.green(), tournament.dates);
    }
}

pub fn format_money(amount: f64) -> String {
    // 1,234,567 style grouping; the tracker never deals in cents.
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(45_500.0), "$45,500");
        assert_eq!(format_money(1_620_000.0), "$1,620,000");
        assert_eq!(format_money(-1_000.0), "-$1,000");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Rory McIlroy", 26), "Rory McIlroy");
        assert_eq!(truncate("An Extremely Long Player Name Here", 10).chars().count(), 10);
    }
}
