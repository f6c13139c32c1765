use crate::field::FieldContext;
use crate::types::{Availability, PlayerStats, RankedPlayer};
use std::collections::HashSet;
use tracing::debug;

/// Neutral sub-score substituted when a stat is missing
const NEUTRAL_SCORE: f64 = 50.0;

/// How many prior venue appearances count toward course history
const COURSE_HISTORY_WINDOW: usize = 5;

/// Weights for the five win-probability sub-scores
///
/// The weights must sum to 1.0; the default set is the tracker's tuned
/// blend. A missing stat keeps its weight and contributes the neutral 50,
/// so partial data never reweights the remaining components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// FedEx Cup rank sub-score weight
    pub fedex_rank: f64,
    /// World ranking sub-score weight
    pub world_rank: f64,
    /// SG:Total sub-score weight
    pub sg_total: f64,
    /// Recent form (last five starts) sub-score weight
    pub recent_form: f64,
    /// Course history sub-score weight
    pub course_history: f64,
}

impl Weights {
    /// Sum of all five weights; 1.0 for a normalized set
    pub fn sum(&self) -> f64 {
        self.fedex_rank + self.world_rank + self.sg_total + self.recent_form + self.course_history
    }

    /// True when the weights sum to 1.0 within floating tolerance
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            fedex_rank: 0.20,
            world_rank: 0.15,
            sg_total: 0.25,
            recent_form: 0.20,
            course_history: 0.20,
        }
    }
}

/// Scoring output for a single player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerScore {
    /// Blended win probability, 0-100
    pub win_probability: f64,
    /// Win probability divided by the rank-only expectation; 0 when the
    /// rank-only score is undefined
    pub value_score: f64,
}

/// Calculates win probabilities and value scores for a tournament field
///
/// Deterministic and side-effect free: the same stats and field context
/// always produce the same scores.
#[derive(Debug, Clone)]
pub struct WinPredictor {
    weights: Weights,
}

impl WinPredictor {
    /// Create a predictor with the default weight blend
    pub fn new() -> Self {
        Self { weights: Weights::default() }
    }

    /// Create a predictor with custom weights
    pub fn with_weights(weights: Weights) -> Self {
        if !weights.is_normalized() {
            tracing::warn!("sub-score weights sum to {} instead of 1.0", weights.sum());
        }
        Self { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Score one player against the field context
    pub fn score(&self, player: &PlayerStats, field: &FieldContext) -> PlayerScore {
        let fedex = rank_score(player.fedex_rank, field.best_fedex_rank, player, "fedex_rank");
        let world = rank_score(player.world_rank, field.best_world_rank, player, "world_rank");
        let sg = sg_score(player, field);
        let form = form_score(player);
        let course = course_history_score(player);

        let w = &self.weights;
        let win_probability = (w.fedex_rank * fedex
            + w.world_rank * world
            + w.sg_total * sg
            + w.recent_form * form
            + w.course_history * course)
            .clamp(0.0, 100.0);

        PlayerScore {
            win_probability,
            value_score: value_score(win_probability, fedex, world, w),
        }
    }

    /// Rank an entire field, annotating each player with availability
    ///
    /// Output is sorted by descending win probability; ties break on
    /// ascending FedEx rank, then player id, so repeated runs over the same
    /// cache render identically.
    pub fn rank_field(
        &self,
        field: &[PlayerStats],
        locked: &HashSet<String>,
    ) -> Vec<RankedPlayer> {
        let ctx = FieldContext::from_field(field);

        let mut ranked: Vec<RankedPlayer> = field
            .iter()
            .map(|player| {
                let score = self.score(player, &ctx);
                let availability = if locked.contains(&player.player_id) {
                    Availability::Locked
                } else {
                    Availability::Available
                };

                RankedPlayer {
                    player_id: player.player_id.clone(),
                    name: player.name.clone(),
                    win_probability: score.win_probability,
                    value_score: score.value_score,
                    fedex_rank: player.fedex_rank,
                    availability,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.win_probability
                .total_cmp(&a.win_probability)
                .then_with(|| {
                    a.fedex_rank.unwrap_or(u32::MAX).cmp(&b.fedex_rank.unwrap_or(u32::MAX))
                })
                .then_with(|| a.player_id.cmp(&b.player_id))
        });

        ranked
    }
}

impl Default for WinPredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// Inverse-rank normalization: the field's best rank maps to 100
///
/// A rank twice the field's best scores 50, and so on down; the worst rank
/// in any real field stays nonzero. Missing ranks substitute the neutral
/// score.
fn rank_score(
    rank: Option<u32>,
    field_best: Option<u32>,
    player: &PlayerStats,
    stat: &str,
) -> f64 {
    match (rank, field_best) {
        (Some(rank), Some(best)) if rank > 0 => (100.0 * best as f64 / rank as f64).min(100.0),
        _ => {
            debug!(player = %player.name, stat, "missing rank, substituting neutral sub-score");
            NEUTRAL_SCORE
        }
    }
}

/// SG:Total scaled linearly around the field mean: 50 at the field average,
/// +25 per standard deviation above it, clamped to [0,100]
fn sg_score(player: &PlayerStats, field: &FieldContext) -> f64 {
    let Some(sg_total) = player.sg_total else {
        debug!(player = %player.name, stat = "sg_total", "missing stat, substituting neutral sub-score");
        return NEUTRAL_SCORE;
    };

    let spread = &field.sg_total_spread;
    if spread.is_flat() {
        return NEUTRAL_SCORE;
    }

    let z = (sg_total - spread.mean) / spread.stdev;
    (NEUTRAL_SCORE + 25.0 * z).clamp(0.0, 100.0)
}

/// Recent form buckets from average finish over the last five starts
fn form_score(player: &PlayerStats) -> f64 {
    match player.recent_avg_finish {
        Some(avg) if avg < 10.0 => 90.0,
        Some(avg) if avg < 20.0 => 70.0,
        Some(avg) if avg < 40.0 => 50.0,
        Some(_) => 30.0,
        None => {
            debug!(player = %player.name, stat = "recent_avg_finish", "missing stat, substituting neutral sub-score");
            NEUTRAL_SCORE
        }
    }
}

/// Course history buckets from the player's most recent venue finishes
///
/// A win or multiple top-10s lands the top bucket; a lone top-10 the good
/// bucket. No history is neutral, never a penalty below the missing-data
/// default.
fn course_history_score(player: &PlayerStats) -> f64 {
    let recent: Vec<u32> = player
        .course_history
        .iter()
        .take(COURSE_HISTORY_WINDOW)
        .map(|finish| finish.position)
        .collect();

    if recent.is_empty() {
        return NEUTRAL_SCORE;
    }

    let wins = recent.iter().filter(|&&pos| pos == 1).count();
    let top_tens = recent.iter().filter(|&&pos| pos <= 10).count();

    if wins >= 1 || top_tens >= 2 {
        90.0
    } else if top_tens == 1 {
        70.0
    } else {
        let avg = recent.iter().sum::<u32>() as f64 / recent.len() as f64;
        if avg < 40.0 {
            50.0
        } else {
            35.0
        }
    }
}

/// Value = win probability over the rank-only expectation
///
/// The denominator re-normalizes the FedEx and world sub-scores back to
/// [0,100]; when that expectation is zero (or the rank weights are), the
/// value score is defined as 0 rather than blowing up.
fn value_score(win_probability: f64, fedex: f64, world: f64, weights: &Weights) -> f64 {
    let rank_weight = weights.fedex_rank + weights.world_rank;
    if rank_weight <= f64::EPSILON {
        return 0.0;
    }

    let rank_only = (weights.fedex_rank * fedex + weights.world_rank * world) / rank_weight;
    if rank_only <= f64::EPSILON {
        return 0.0;
    }

    win_probability / rank_only
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseFinish;

    fn player(
        id: &str,
        fedex: Option<u32>,
        world: Option<u32>,
        sg: Option<f64>,
        form: Option<f64>,
    ) -> PlayerStats {
        let mut p = PlayerStats::new(id, format!("Player {id}"));
        p.fedex_rank = fedex;
        p.world_rank = world;
        p.sg_total = sg;
        p.recent_avg_finish = form;
        p
    }

    fn score_in_field(target: &PlayerStats, field: &[PlayerStats]) -> PlayerScore {
        let ctx = FieldContext::from_field(field);
        WinPredictor::new().score(target, &ctx)
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((Weights::default().sum() - 1.0).abs() < 1e-6);
        assert!(Weights::default().is_normalized());
    }

    #[test]
    fn test_win_probability_stays_in_range() {
        let field = vec![
            player("1", Some(1), Some(1), Some(2.8), Some(4.0)),
            player("2", Some(150), Some(300), Some(-3.5), Some(70.0)),
            player("3", None, None, None, None),
        ];
        let ctx = FieldContext::from_field(&field);
        let predictor = WinPredictor::new();

        for p in &field {
            let score = predictor.score(p, &ctx);
            assert!(
                (0.0..=100.0).contains(&score.win_probability),
                "probability {} out of range for {}",
                score.win_probability,
                p.player_id
            );
        }
    }

    #[test]
    fn test_inverse_rank_normalization() {
        // Field of three with FedEx ranks 1, 2, 3 and equal stats otherwise.
        let field = vec![
            player("1", Some(1), Some(5), Some(1.0), Some(15.0)),
            player("2", Some(2), Some(5), Some(1.0), Some(15.0)),
            player("3", Some(3), Some(5), Some(1.0), Some(15.0)),
        ];
        let ctx = FieldContext::from_field(&field);

        let s1 = rank_score(Some(1), ctx.best_fedex_rank, &field[0], "fedex_rank");
        let s2 = rank_score(Some(2), ctx.best_fedex_rank, &field[1], "fedex_rank");
        let s3 = rank_score(Some(3), ctx.best_fedex_rank, &field[2], "fedex_rank");

        assert!((s1 - 100.0).abs() < 1e-9);
        assert!(s3 > 0.0, "worst rank in field must stay nonzero");
        assert!(s2 < s1 && s2 > s3, "middle rank must fall strictly between");
    }

    #[test]
    fn test_single_player_field_scores_100_on_ranks() {
        let field = vec![player("solo", Some(37), Some(52), Some(0.1), Some(25.0))];
        let ctx = FieldContext::from_field(&field);

        assert!((rank_score(Some(37), ctx.best_fedex_rank, &field[0], "fedex_rank") - 100.0).abs() < 1e-9);
        assert!((rank_score(Some(52), ctx.best_world_rank, &field[0], "world_rank") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_player_outscores_field() {
        let mut best = player("best", Some(1), Some(1), Some(2.5), Some(5.0));
        best.course_history = vec![
            CourseFinish { year: 2025, position: 1 },
            CourseFinish { year: 2024, position: 3 },
        ];

        let field = vec![
            best.clone(),
            player("mid", Some(20), Some(25), Some(0.3), Some(22.0)),
            player("tail", Some(90), Some(120), Some(-1.1), Some(48.0)),
        ];
        let ctx = FieldContext::from_field(&field);
        let predictor = WinPredictor::new();

        let top = predictor.score(&best, &ctx).win_probability;
        for other in &field[1..] {
            let prob = predictor.score(other, &ctx).win_probability;
            assert!(top > prob, "{} should not reach the dominant player", other.player_id);
        }
    }

    #[test]
    fn test_missing_stats_use_neutral_default() {
        let bare = player("bare", None, None, None, None);
        let field = vec![
            bare.clone(),
            player("full", Some(1), Some(1), Some(1.5), Some(8.0)),
            player("other", Some(9), Some(14), Some(-0.5), Some(30.0)),
        ];

        let score = score_in_field(&bare, &field);
        // Every sub-score is the neutral 50, so the blend is exactly 50.
        assert!((score.win_probability - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_course_history_is_neutral() {
        let no_history = player("nh", Some(5), Some(5), Some(0.0), Some(15.0));
        assert!((course_history_score(&no_history) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_course_history_buckets() {
        let mut p = player("ch", Some(5), Some(5), Some(0.0), Some(15.0));

        p.course_history = vec![
            CourseFinish { year: 2025, position: 4 },
            CourseFinish { year: 2024, position: 7 },
        ];
        assert!((course_history_score(&p) - 90.0).abs() < 1e-9, "multiple top-10s");

        p.course_history = vec![
            CourseFinish { year: 2025, position: 8 },
            CourseFinish { year: 2024, position: 33 },
        ];
        assert!((course_history_score(&p) - 70.0).abs() < 1e-9, "single top-10");

        p.course_history = vec![CourseFinish { year: 2025, position: 55 }];
        assert!((course_history_score(&p) - 35.0).abs() < 1e-9, "weak history");

        p.course_history = vec![CourseFinish { year: 2020, position: 1 }];
        assert!((course_history_score(&p) - 90.0).abs() < 1e-9, "a win is the top bucket");
    }

    #[test]
    fn test_only_recent_course_history_counts() {
        let mut p = player("old", Some(5), Some(5), Some(0.0), Some(15.0));
        // Six appearances; the win is the oldest and falls outside the window.
        p.course_history = vec![
            CourseFinish { year: 2025, position: 40 },
            CourseFinish { year: 2024, position: 51 },
            CourseFinish { year: 2023, position: 47 },
            CourseFinish { year: 2022, position: 60 },
            CourseFinish { year: 2021, position: 44 },
            CourseFinish { year: 2019, position: 1 },
        ];
        assert!((course_history_score(&p) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_form_buckets() {
        assert!((form_score(&player("a", None, None, None, Some(6.0))) - 90.0).abs() < 1e-9);
        assert!((form_score(&player("b", None, None, None, Some(14.0))) - 70.0).abs() < 1e-9);
        assert!((form_score(&player("c", None, None, None, Some(33.0))) - 50.0).abs() < 1e-9);
        assert!((form_score(&player("d", None, None, None, Some(61.0))) - 30.0).abs() < 1e-9);
        assert!((form_score(&player("e", None, None, None, None)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_sg_scales_around_field_mean() {
        let field = vec![
            player("hot", None, None, Some(2.0), None),
            player("avg", None, None, Some(0.0), None),
            player("cold", None, None, Some(-2.0), None),
        ];
        let ctx = FieldContext::from_field(&field);

        assert!(sg_score(&field[0], &ctx) > 50.0);
        assert!((sg_score(&field[1], &ctx) - 50.0).abs() < 1e-9);
        assert!(sg_score(&field[2], &ctx) < 50.0);
    }

    #[test]
    fn test_zero_rank_denominator_yields_zero_value() {
        // Rank weights zeroed out: the rank-only expectation is undefined,
        // so the value score collapses to 0 instead of dividing by zero.
        let weights = Weights {
            fedex_rank: 0.0,
            world_rank: 0.0,
            sg_total: 0.5,
            recent_form: 0.3,
            course_history: 0.2,
        };
        let predictor = WinPredictor::with_weights(weights);

        let field = vec![player("p", Some(1), Some(1), Some(1.0), Some(12.0))];
        let ctx = FieldContext::from_field(&field);
        let score = predictor.score(&field[0], &ctx);

        assert_eq!(score.value_score, 0.0);
        assert!(score.win_probability > 0.0);
    }

    #[test]
    fn test_value_score_flags_outperformers() {
        // Deep rank but elite ball-striking and form: value well above 1.0.
        let mut sleeper = player("sleeper", Some(80), Some(95), Some(2.2), Some(8.0));
        sleeper.course_history = vec![
            CourseFinish { year: 2025, position: 2 },
            CourseFinish { year: 2024, position: 6 },
        ];
        let field = vec![
            sleeper.clone(),
            player("chalk", Some(1), Some(1), Some(0.1), Some(18.0)),
            player("filler", Some(40), Some(50), Some(-1.0), Some(35.0)),
        ];

        let score = score_in_field(&sleeper, &field);
        assert!(score.value_score > 1.0, "value score was {}", score.value_score);
    }

    #[test]
    fn test_rank_field_orders_and_annotates() {
        let field = vec![
            player("300", Some(3), Some(3), Some(-0.5), Some(30.0)),
            player("100", Some(1), Some(1), Some(1.5), Some(9.0)),
            player("200", Some(2), Some(2), Some(0.5), Some(16.0)),
        ];
        let locked: HashSet<String> = ["200".to_string()].into_iter().collect();

        let ranked = WinPredictor::new().rank_field(&field, &locked);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].player_id, "100");
        assert_eq!(ranked[1].player_id, "200");
        assert_eq!(ranked[2].player_id, "300");
        assert!(ranked[0].availability.is_available());
        assert_eq!(ranked[1].availability, Availability::Locked);
        for pair in ranked.windows(2) {
            assert!(pair[0].win_probability >= pair[1].win_probability);
        }
    }

    #[test]
    fn test_ties_break_on_fedex_rank_then_id() {
        // Zero out the FedEx weight so two players with different FedEx
        // ranks land identical probabilities; the better rank sorts first,
        // and rankless equals fall back to id order.
        let weights = Weights {
            fedex_rank: 0.0,
            world_rank: 0.35,
            sg_total: 0.25,
            recent_form: 0.20,
            course_history: 0.20,
        };
        let field = vec![
            player("x", Some(7), Some(5), Some(0.0), Some(25.0)),
            player("y", Some(2), Some(5), Some(0.0), Some(25.0)),
            player("b", None, Some(5), Some(0.0), Some(25.0)),
            player("a", None, Some(5), Some(0.0), Some(25.0)),
        ];
        let ranked = WinPredictor::with_weights(weights).rank_field(&field, &HashSet::new());

        assert_eq!(ranked[0].win_probability, ranked[3].win_probability);
        assert_eq!(ranked[0].player_id, "y");
        assert_eq!(ranked[1].player_id, "x");
        assert_eq!(ranked[2].player_id, "a");
        assert_eq!(ranked[3].player_id, "b");
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let field = vec![
            player("1", Some(4), Some(9), Some(0.9), Some(13.0)),
            player("2", Some(31), Some(44), Some(-0.2), Some(27.0)),
        ];
        let first = WinPredictor::new().rank_field(&field, &HashSet::new());
        let second = WinPredictor::new().rank_field(&field, &HashSet::new());

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.player_id, b.player_id);
            assert_eq!(a.win_probability, b.win_probability);
            assert_eq!(a.value_score, b.value_score);
        }
    }
}
