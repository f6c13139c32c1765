use crate::types::PlayerStats;

/// Spread below which a field is treated as having no SG separation
const SPREAD_EPSILON: f64 = 1e-9;

/// Mean and standard deviation of a stat across the field
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadStats {
    pub mean: f64,
    pub stdev: f64,
}

impl SpreadStats {
    /// Population mean and standard deviation; zeroed for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self { mean, stdev: variance.sqrt() }
    }

    /// True when the field shows no measurable separation in this stat
    pub fn is_flat(&self) -> bool {
        self.stdev < SPREAD_EPSILON
    }
}

/// Field-wide aggregates used to normalize per-player sub-scores
///
/// Built once per ranking pass from the full tournament field. Rank-based
/// sub-scores normalize against the best rank present in the field, and the
/// SG sub-score scales against the field's mean and spread, so a score of
/// 100 always means "best in this field" rather than "best on tour".
#[derive(Debug, Clone, Default)]
pub struct FieldContext {
    /// Lowest (best) FedEx Cup rank present in the field
    pub best_fedex_rank: Option<u32>,

    /// Lowest (best) world ranking present in the field
    pub best_world_rank: Option<u32>,

    /// Mean and spread of SG:Total across players that have the stat
    pub sg_total_spread: SpreadStats,
}

impl FieldContext {
    /// Compute the normalization context for a tournament field
    pub fn from_field(field: &[PlayerStats]) -> Self {
        let best_fedex_rank = field.iter().filter_map(|p| p.fedex_rank).min();
        let best_world_rank = field.iter().filter_map(|p| p.world_rank).min();
        let sg_values: Vec<f64> = field.iter().filter_map(|p| p.sg_total).collect();

        Self {
            best_fedex_rank,
            best_world_rank,
            sg_total_spread: SpreadStats::from_values(&sg_values),
        }
    }
}
