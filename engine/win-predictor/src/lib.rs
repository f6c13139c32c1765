//! Win probability and value scoring for PGA Tour tournament fields
//!
//! This crate is the scoring core of the pick tracker. Given the cached
//! stats for every player in a tournament field, it produces a 0-100 win
//! probability per player (a weighted blend of five field-normalized
//! sub-scores) and a value score that flags players outperforming what
//! their ranking alone would predict.
//!
//! Everything here is a pure function of its inputs: no I/O, no clock, no
//! store access. The CLI feeds it cached stats and the current lock set.

pub mod field;
pub mod score;
pub mod types;

pub use field::FieldContext;
pub use score::{PlayerScore, Weights, WinPredictor};
pub use types::{Availability, CourseFinish, PlayerStats, RankedPlayer};
