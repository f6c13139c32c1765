//! Pure conversions from ESPN response models into tracker types
//!
//! Kept free of I/O so the whole normalization path is testable against
//! fixture JSON.

use crate::models::{Event, EventLog, Scoreboard, StatisticsPage, Tournament};
use crate::rankings::WorldRanking;
use chrono::{Duration, NaiveDate};
use tracing::debug;
use win_predictor::{CourseFinish, PlayerStats};

/// How many recent starts feed the recent-form average
const RECENT_FORM_WINDOW: usize = 5;

/// Event status names that mark the tournament to display
const ACTIVE_STATUSES: [&str; 2] = ["STATUS_IN_PROGRESS", "STATUS_SCHEDULED"];

/// The in-progress or next scheduled event on the scoreboard, if any
pub fn active_event(scoreboard: &Scoreboard) -> Option<&Event> {
    scoreboard.events.iter().find(|event| {
        event
            .status
            .as_ref()
            .and_then(|status| status.status_type.as_ref())
            .and_then(|t| t.name.as_deref())
            .is_some_and(|name| ACTIVE_STATUSES.contains(&name))
    })
}

/// Tournament metadata from a scoreboard event
pub fn tournament_from_event(event: &Event) -> Tournament {
    let course = event
        .competitions
        .first()
        .and_then(|c| c.venue.as_ref())
        .and_then(|v| v.full_name.clone())
        .unwrap_or_else(|| "TBD".to_string());

    Tournament {
        tournament_id: event.id.clone(),
        name: event.name.clone(),
        dates: date_range_label(&event.date),
        course,
        purse: event.display_purse.clone(),
    }
}

/// Next tournament from the league calendar that has not ended yet
///
/// Used when the scoreboard itself carries no active event, mirroring the
/// off-week behavior of the scoreboard page. `today` is passed in so the
/// walk stays deterministic under test.
pub fn next_calendar_tournament(scoreboard: &Scoreboard, today: NaiveDate) -> Option<Tournament> {
    let calendar = scoreboard.leagues.first().map(|l| &l.calendar)?;

    for entry in calendar {
        let Some(start) = entry.start_date.as_deref().and_then(parse_date) else {
            continue;
        };
        let end = entry
            .end_date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(start + Duration::days(3));

        if end >= today - Duration::days(1) {
            return Some(Tournament {
                tournament_id: entry.id.clone().unwrap_or_default(),
                name: entry.label.clone().unwrap_or_else(|| "Unknown Tournament".to_string()),
                dates: format_date_range(start, end),
                course: "TBD".to_string(),
                purse: None,
            });
        }
    }

    None
}

/// The tournament field as bare (id, name) stat records
pub fn field_from_event(event: &Event) -> Vec<PlayerStats> {
    let Some(competition) = event.competitions.first() else {
        return Vec::new();
    };

    competition
        .competitors
        .iter()
        .filter_map(|competitor| {
            let Some(athlete) = competitor.athlete.as_ref() else {
                debug!("competitor without athlete payload, skipping");
                return None;
            };
            Some(PlayerStats::new(athlete.id.clone(), athlete.display_name.clone()))
        })
        .collect()
}

/// Join season statistics categories onto the field by athlete id
///
/// Unknown categories are ignored; leaders without an athlete reference are
/// skipped. Anything that stays unset scores the neutral default later.
pub fn apply_statistics(field: &mut [PlayerStats], page: &StatisticsPage) {
    for category in &page.categories {
        for (index, leader) in category.leaders.iter().enumerate() {
            let Some(athlete) = leader.athlete.as_ref() else {
                debug!(category = %category.name, "statistics leader without athlete, skipping");
                continue;
            };
            let Some(player) = field.iter_mut().find(|p| p.player_id == athlete.id) else {
                continue;
            };

            let rank = leader.rank.unwrap_or(index as u32 + 1);
            match category.name.as_str() {
                "fedexCupStandings" | "cupPoints" => player.fedex_rank = Some(rank),
                "worldRanking" | "owgr" => player.world_rank = Some(rank),
                "earnings" => player.season_earnings = leader.value,
                "sgTotal" => player.sg_total = leader.value,
                "sgOffTheTee" => player.sg_off_tee = leader.value,
                "sgApproach" => player.sg_approach = leader.value,
                "sgAroundTheGreen" => player.sg_around_green = leader.value,
                "sgPutting" => player.sg_putting = leader.value,
                _ => {}
            }
        }
    }
}

/// Fill recent form and venue history from an athlete's event log
pub fn apply_event_log(player: &mut PlayerStats, log: &EventLog, venue: &str) {
    let finishes: Vec<u32> = log
        .events
        .iter()
        .filter_map(|entry| entry.finish_position)
        .take(RECENT_FORM_WINDOW)
        .collect();

    if !finishes.is_empty() {
        player.recent_avg_finish =
            Some(finishes.iter().sum::<u32>() as f64 / finishes.len() as f64);
    }

    player.course_history = log
        .events
        .iter()
        .filter(|entry| {
            entry.venue.as_deref().is_some_and(|event_venue| venues_match(event_venue, venue))
        })
        .filter_map(|entry| {
            Some(CourseFinish { year: entry.year?, position: entry.finish_position? })
        })
        .collect();
}

/// Backfill world rankings by name from the HTML fallback table
pub fn apply_world_rankings(field: &mut [PlayerStats], rankings: &[WorldRanking]) {
    for ranking in rankings {
        if let Some(player) =
            field.iter_mut().find(|p| p.name.eq_ignore_ascii_case(&ranking.name))
        {
            player.world_rank = Some(ranking.rank);
        }
    }
}

fn venues_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a == b || a.contains(&b) || b.contains(&a)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

/// "Feb 05-08, 2026" from an event's ISO start date, assuming a
/// Thursday-Sunday run when the feed gives only the start
fn date_range_label(raw: &str) -> String {
    match parse_date(raw) {
        Some(start) => format_date_range(start, start + Duration::days(3)),
        None => "TBD".to_string(),
    }
}

fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{}-{}, {}", start.format("%b %d"), end.format("%d"), start.format("%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOREBOARD_JSON: &str = r#"{
        "events": [
            {
                "id": "401580329",
                "name": "AT&T Pebble Beach Pro-Am",
                "date": "2026-02-05T08:00Z",
                "status": { "type": { "name": "STATUS_SCHEDULED" } },
                "displayPurse": "$20,000,000",
                "competitions": [
                    {
                        "venue": { "fullName": "Pebble Beach Golf Links" },
                        "competitors": [
                            { "athlete": { "id": "9478", "displayName": "Scottie Scheffler" } },
                            { "athlete": { "id": "3470", "displayName": "Rory McIlroy" } },
                            { }
                        ]
                    }
                ]
            }
        ],
        "leagues": [
            {
                "calendar": [
                    { "id": "401580310", "label": "The Sentry", "startDate": "2026-01-08T08:00Z", "endDate": "2026-01-11T08:00Z" },
                    { "id": "401580329", "label": "AT&T Pebble Beach Pro-Am", "startDate": "2026-02-05T08:00Z", "endDate": "2026-02-08T08:00Z" }
                ]
            }
        ]
    }"#;

    const STATISTICS_JSON: &str = r#"{
        "categories": [
            { "name": "fedexCupStandings", "leaders": [
                { "athlete": { "id": "9478", "displayName": "Scottie Scheffler" }, "value": 2602.0, "rank": 1 },
                { "athlete": { "id": "3470", "displayName": "Rory McIlroy" }, "value": 1890.0 }
            ]},
            { "name": "sgTotal", "leaders": [
                { "athlete": { "id": "9478" }, "value": 2.61, "rank": 1 },
                { "athlete": null, "value": 1.95 }
            ]},
            { "name": "earnings", "leaders": [
                { "athlete": { "id": "3470" }, "value": 8100000.0, "rank": 2 }
            ]},
            { "name": "puttsPerHole", "leaders": [
                { "athlete": { "id": "9478" }, "value": 1.71 }
            ]}
        ]
    }"#;

    const EVENT_LOG_JSON: &str = r#"{
        "events": [
            { "eventName": "The Sentry", "venue": "Plantation Course at Kapalua", "year": 2026, "finishPosition": 3 },
            { "eventName": "Farmers Insurance Open", "venue": "Torrey Pines", "year": 2026, "finishPosition": 12 },
            { "eventName": "AT&T Pebble Beach Pro-Am", "venue": "Pebble Beach Golf Links", "year": 2025, "finishPosition": 6 },
            { "eventName": "AT&T Pebble Beach Pro-Am", "venue": "Pebble Beach Golf Links", "year": 2024, "finishPosition": 41 },
            { "eventName": "The Open Championship", "venue": "Royal Troon", "year": 2025, "finishPosition": 7 },
            { "eventName": "Tour Championship", "venue": "East Lake", "year": 2025, "finishPosition": 2 }
        ]
    }"#;

    fn scoreboard() -> Scoreboard {
        serde_json::from_str(SCOREBOARD_JSON).unwrap()
    }

    #[test]
    fn test_active_event_and_tournament() {
        let board = scoreboard();
        let event = active_event(&board).expect("scheduled event");
        let tournament = tournament_from_event(event);

        assert_eq!(tournament.tournament_id, "401580329");
        assert_eq!(tournament.name, "AT&T Pebble Beach Pro-Am");
        assert_eq!(tournament.course, "Pebble Beach Golf Links");
        assert_eq!(tournament.dates, "Feb 05-08, 2026");
        assert_eq!(tournament.purse.as_deref(), Some("$20,000,000"));
    }

    #[test]
    fn test_field_skips_malformed_competitors() {
        let board = scoreboard();
        let field = field_from_event(active_event(&board).unwrap());

        assert_eq!(field.len(), 2);
        assert_eq!(field[0].player_id, "9478");
        assert_eq!(field[1].name, "Rory McIlroy");
    }

    #[test]
    fn test_apply_statistics_joins_by_athlete_id() {
        let board = scoreboard();
        let mut field = field_from_event(active_event(&board).unwrap());
        let page: StatisticsPage = serde_json::from_str(STATISTICS_JSON).unwrap();

        apply_statistics(&mut field, &page);

        let scheffler = &field[0];
        assert_eq!(scheffler.fedex_rank, Some(1));
        assert_eq!(scheffler.sg_total, Some(2.61));
        assert_eq!(scheffler.season_earnings, None);

        let mcilroy = &field[1];
        // No explicit rank on the second leader: list order stands in.
        assert_eq!(mcilroy.fedex_rank, Some(2));
        assert_eq!(mcilroy.season_earnings, Some(8_100_000.0));
        assert_eq!(mcilroy.sg_total, None);
    }

    #[test]
    fn test_apply_event_log_form_and_history() {
        let mut player = PlayerStats::new("9478", "Scottie Scheffler");
        let log: EventLog = serde_json::from_str(EVENT_LOG_JSON).unwrap();

        apply_event_log(&mut player, &log, "Pebble Beach Golf Links");

        // First five finishes: 3, 12, 6, 41, 7.
        assert!((player.recent_avg_finish.unwrap() - 13.8).abs() < 1e-9);

        assert_eq!(player.course_history.len(), 2);
        assert_eq!(player.course_history[0], CourseFinish { year: 2025, position: 6 });
        assert_eq!(player.course_history[1], CourseFinish { year: 2024, position: 41 });
    }

    #[test]
    fn test_event_log_without_finishes_leaves_defaults() {
        let mut player = PlayerStats::new("1", "No Starts");
        let log: EventLog = serde_json::from_str(r#"{ "events": [] }"#).unwrap();

        apply_event_log(&mut player, &log, "Pebble Beach Golf Links");

        assert_eq!(player.recent_avg_finish, None);
        assert!(player.course_history.is_empty());
    }

    #[test]
    fn test_calendar_fallback_skips_finished_events() {
        let board = scoreboard();
        let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();

        let next = next_calendar_tournament(&board, today).expect("upcoming entry");
        assert_eq!(next.name, "AT&T Pebble Beach Pro-Am");
        assert_eq!(next.dates, "Feb 05-08, 2026");
        assert_eq!(next.course, "TBD");
    }

    #[test]
    fn test_calendar_fallback_exhausted() {
        let board = scoreboard();
        let today = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert!(next_calendar_tournament(&board, today).is_none());
    }

    #[test]
    fn test_apply_world_rankings_matches_by_name() {
        let board = scoreboard();
        let mut field = field_from_event(active_event(&board).unwrap());
        let rankings = vec![
            WorldRanking { rank: 1, name: "SCOTTIE SCHEFFLER".to_string() },
            WorldRanking { rank: 2, name: "Jon Rahm".to_string() },
        ];

        apply_world_rankings(&mut field, &rankings);

        assert_eq!(field[0].world_rank, Some(1));
        assert_eq!(field[1].world_rank, None);
    }
}
