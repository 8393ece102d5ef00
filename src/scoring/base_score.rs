//! Base score calculation.
//!
//! Converts a raw metric value into a score out of 100 relative to its
//! target, before any bonus or penalty is applied.

use rust_decimal::Decimal;

use crate::config::{MetricDefinition, Polarity};
use crate::models::AuditStep;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The result of scoring a raw value against its target.
#[derive(Debug, Clone)]
pub struct BaseScoreResult {
    /// The score, capped to `[0, max_score]` and not yet rounded.
    pub base_score: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Scores a raw value against a target.
///
/// - Higher-is-better metrics score `raw / target × 100`.
/// - Lower-is-better metrics score `target / raw × 100`; a raw value of zero
///   earns the metric's `max_score`.
///
/// The score is capped to `[0, max_score]`. `target` must be positive; the
/// scoring engine checks this before calling.
///
/// # Examples
///
/// ```
/// use points_engine::config::{Aggregation, MetricDefinition, Polarity};
/// use points_engine::scoring::calculate_base_score;
/// use rust_decimal::Decimal;
///
/// let metric = MetricDefinition {
///     name: "Error Rate".to_string(),
///     unit: "percent".to_string(),
///     polarity: Polarity::LowerIsBetter,
///     weight: Decimal::new(15, 2),
///     target: Decimal::from(2),
///     max_score: Decimal::from(100),
///     aggregation: Aggregation::Average,
///     adjustments: vec![],
///     conditional_bonuses: vec![],
/// };
///
/// let result = calculate_base_score("error_rate", Decimal::from(4), metric.target, &metric, 1);
/// assert_eq!(result.base_score, Decimal::from(50));
/// ```
pub fn calculate_base_score(
    metric_code: &str,
    raw_value: Decimal,
    target: Decimal,
    metric: &MetricDefinition,
    step_number: u32,
) -> BaseScoreResult {
    let (uncapped, formula) = match metric.polarity {
        Polarity::HigherIsBetter => (
            ratio_score(raw_value, target),
            format!("{} / {} x 100", raw_value.normalize(), target.normalize()),
        ),
        Polarity::LowerIsBetter if raw_value.is_zero() => (
            Some(metric.max_score),
            "zero raw value earns the maximum score".to_string(),
        ),
        Polarity::LowerIsBetter => (
            ratio_score(target, raw_value),
            format!("{} / {} x 100", target.normalize(), raw_value.normalize()),
        ),
    };

    // Both operands are non-negative, so an overflowing ratio is above any cap.
    let base_score = uncapped
        .map_or(metric.max_score, |score| score.max(Decimal::ZERO))
        .min(metric.max_score);
    let capped = uncapped != Some(base_score);

    let reasoning = match uncapped {
        Some(uncapped) if capped => format!(
            "{} = {}, capped to {}",
            formula,
            uncapped.round_dp(2).normalize(),
            base_score.normalize()
        ),
        Some(_) => format!("{} = {}", formula, base_score.round_dp(2).normalize()),
        None => format!(
            "{} exceeds the decimal range, capped to {}",
            formula,
            base_score.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_score".to_string(),
        rule_name: "Base Score".to_string(),
        metric_code: Some(metric_code.to_string()),
        input: serde_json::json!({
            "raw_value": raw_value.normalize().to_string(),
            "target": target.normalize().to_string(),
            "polarity": polarity_str(metric.polarity),
            "max_score": metric.max_score.normalize().to_string()
        }),
        output: serde_json::json!({
            "base_score": base_score.round_dp(2).normalize().to_string(),
            "capped": capped
        }),
        reasoning,
    };

    BaseScoreResult {
        base_score,
        audit_step,
    }
}

/// `numerator / denominator x 100`, or `None` if it overflows.
fn ratio_score(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
}

pub(crate) fn polarity_str(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::HigherIsBetter => "higher_is_better",
        Polarity::LowerIsBetter => "lower_is_better",
    }
}
