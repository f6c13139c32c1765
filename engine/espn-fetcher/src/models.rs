use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tournament metadata shown alongside the ranked field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// ESPN event ID
    pub tournament_id: String,
    /// Tournament name (e.g., "AT&T Pebble Beach Pro-Am")
    pub name: String,
    /// Display date range (e.g., "Feb 05-08, 2026")
    pub dates: String,
    /// Host course name; "TBD" when the feed has no venue yet
    pub course: String,
    /// Display purse, when the feed carries one
    pub purse: Option<String>,
}

/// ESPN scoreboard response
#[derive(Debug, Clone, Deserialize)]
pub struct Scoreboard {
    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(default)]
    pub leagues: Vec<League>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub date: String,

    pub status: Option<EventStatus>,

    #[serde(default)]
    pub competitions: Vec<Competition>,

    #[serde(rename = "displayPurse")]
    pub display_purse: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventStatus {
    #[serde(rename = "type")]
    pub status_type: Option<StatusType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusType {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Competition {
    pub venue: Option<Venue>,

    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Competitor {
    pub athlete: Option<Athlete>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Athlete {
    pub id: String,

    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct League {
    #[serde(default)]
    pub calendar: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEntry {
    pub id: Option<String>,

    pub label: Option<String>,

    #[serde(rename = "startDate")]
    pub start_date: Option<String>,

    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// ESPN season statistics response: named categories of per-athlete values
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsPage {
    #[serde(default)]
    pub categories: Vec<StatCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatCategory {
    pub name: String,

    #[serde(default)]
    pub leaders: Vec<StatLeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatLeader {
    pub athlete: Option<AthleteRef>,

    pub value: Option<f64>,

    /// Position within the category; missing entries fall back to list order
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AthleteRef {
    pub id: String,

    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// Per-athlete event log: recent tournament starts with finishes
#[derive(Debug, Clone, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub events: Vec<EventLogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventLogEntry {
    #[serde(rename = "eventName")]
    pub event_name: Option<String>,

    pub venue: Option<String>,

    pub year: Option<i32>,

    #[serde(rename = "finishPosition")]
    pub finish_position: Option<u32>,
}

/// Events emitted by a refresh cycle
#[derive(Debug, Clone, Serialize)]
pub enum FetchEvent {
    /// The stat cache was replaced with a fresh field
    StatsRefreshed {
        tournament: String,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// No current or upcoming tournament on the schedule
    NoTournament { timestamp: DateTime<Utc> },

    /// The refresh failed; the previous cache is still in place
    FetchFailed {
        endpoint: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}
