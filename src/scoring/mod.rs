//! Scoring logic for the performance model.
//!
//! This module contains the scoring rules that turn raw metric values into
//! grades: base scores relative to target, threshold bonuses and penalties,
//! bonuses gated on other metrics, letter-grade cutoffs, and the weighted
//! overall grade. [`grade_scorecard`] runs them in order.

mod adjustments;
mod aggregate;
mod base_score;
mod conditional_bonus;
mod engine;
mod grade_cutoffs;

pub use adjustments::{AdjustmentResult, adjustment_applies, apply_adjustments};
pub use aggregate::{AggregateResult, aggregate_grades, aggregate_metric_values};
pub use base_score::{BaseScoreResult, calculate_base_score};
pub use conditional_bonus::{
    ConditionalBonusResult, GateOutcome, apply_conditional_bonuses, evaluate_gate,
};
pub use engine::{MetricGradeResult, grade_metric, grade_scorecard};
pub use grade_cutoffs::{SCORE_DECIMAL_PLACES, grade_for_score, round_score};
