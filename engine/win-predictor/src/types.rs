use serde::{Deserialize, Serialize};
use std::fmt;

/// Cached statistics for a single tour player
///
/// One record per player per refresh cycle, overwritten wholesale. Every
/// stat field is optional because the upstream feeds are patchy; missing
/// fields fall back to a neutral sub-score during scoring instead of
/// failing the computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    /// ESPN athlete ID
    pub player_id: String,

    /// Player name (e.g., "Scottie Scheffler")
    pub name: String,

    /// FedEx Cup standings position (1 = leader)
    pub fedex_rank: Option<u32>,

    /// Official World Golf Ranking position
    pub world_rank: Option<u32>,

    /// Season earnings in dollars
    pub season_earnings: Option<f64>,

    /// Strokes gained: total, per round against the field
    pub sg_total: Option<f64>,

    /// Strokes gained: off the tee
    pub sg_off_tee: Option<f64>,

    /// Strokes gained: approach
    pub sg_approach: Option<f64>,

    /// Strokes gained: around the green
    pub sg_around_green: Option<f64>,

    /// Strokes gained: putting
    pub sg_putting: Option<f64>,

    /// Average finish position over the last five starts
    pub recent_avg_finish: Option<f64>,

    /// Finishes at the current venue, most recent year first
    pub course_history: Vec<CourseFinish>,
}

impl PlayerStats {
    /// Create a stats record with no stats populated yet
    pub fn new(player_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            fedex_rank: None,
            world_rank: None,
            season_earnings: None,
            sg_total: None,
            sg_off_tee: None,
            sg_approach: None,
            sg_around_green: None,
            sg_putting: None,
            recent_avg_finish: None,
            course_history: Vec::new(),
        }
    }
}

/// A single prior finish at the current tournament's venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseFinish {
    /// Year the tournament was played
    pub year: i32,
    /// Finish position (1 = win); ties count at their numeric position
    pub position: u32,
}

/// Season lock state of a player, derived from the pick ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// Player has not been picked this season and may be selected
    Available,
    /// Player already carries a pick this season; selection is rejected
    Locked,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "AVAILABLE"),
            Availability::Locked => write!(f, "LOCKED"),
        }
    }
}

/// One row of the ranked field shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlayer {
    /// ESPN athlete ID
    pub player_id: String,
    /// Player name
    pub name: String,
    /// Blended win probability, 0-100
    pub win_probability: f64,
    /// Win probability relative to what ranking alone predicts (~1.0 = par)
    pub value_score: f64,
    /// FedEx Cup rank carried through for display and tie-breaking
    pub fedex_rank: Option<u32>,
    /// Season lock state at the time the field was ranked
    pub availability: Availability,
}
