//! Threshold bonus and penalty adjustments.
//!
//! Each metric may define fixed bonuses and penalties keyed on its own raw
//! value. Which side of the threshold is favourable depends on the metric's
//! polarity.

use rust_decimal::Decimal;

use crate::config::{Adjustment, AdjustmentKind, MetricDefinition, Polarity};
use crate::models::{AdjustmentSource, AppliedAdjustment, AuditStep};

/// The result of evaluating a metric's threshold adjustments.
#[derive(Debug, Clone)]
pub struct AdjustmentResult {
    /// Adjustments that applied, in configuration order.
    pub applied: Vec<AppliedAdjustment>,
    /// Signed sum of the applied adjustments.
    pub total: Decimal,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
}

/// Returns true when `adjustment` applies to `raw_value`.
///
/// | polarity         | bonus applies      | penalty applies   |
/// |------------------|--------------------|-------------------|
/// | higher is better | raw ≥ threshold    | raw < threshold   |
/// | lower is better  | raw ≤ threshold    | raw > threshold   |
pub fn adjustment_applies(adjustment: &Adjustment, polarity: Polarity, raw_value: Decimal) -> bool {
    let threshold = adjustment.threshold;
    match (adjustment.kind, polarity) {
        (AdjustmentKind::Bonus, Polarity::HigherIsBetter) => raw_value >= threshold,
        (AdjustmentKind::Bonus, Polarity::LowerIsBetter) => raw_value <= threshold,
        (AdjustmentKind::Penalty, Polarity::HigherIsBetter) => raw_value < threshold,
        (AdjustmentKind::Penalty, Polarity::LowerIsBetter) => raw_value > threshold,
    }
}

/// Evaluates every threshold adjustment configured for a metric.
///
/// # Examples
///
/// ```
/// use points_engine::config::{Adjustment, AdjustmentKind, Aggregation, MetricDefinition, Polarity};
/// use points_engine::scoring::apply_adjustments;
/// use rust_decimal::Decimal;
///
/// let metric = MetricDefinition {
///     name: "Productivity".to_string(),
///     unit: "tasks".to_string(),
///     polarity: Polarity::HigherIsBetter,
///     weight: Decimal::new(30, 2),
///     target: Decimal::from(100),
///     max_score: Decimal::from(110),
///     aggregation: Aggregation::Sum,
///     adjustments: vec![Adjustment {
///         kind: AdjustmentKind::Penalty,
///         threshold: Decimal::from(60),
///         points: Decimal::from(10),
///         reason: "Output below 60 tasks".to_string(),
///     }],
///     conditional_bonuses: vec![],
/// };
///
/// let result = apply_adjustments("productivity", Decimal::from(59), &metric, 2);
/// assert_eq!(result.total, Decimal::from(-10));
/// ```
pub fn apply_adjustments(
    metric_code: &str,
    raw_value: Decimal,
    metric: &MetricDefinition,
    step_number: u32,
) -> AdjustmentResult {
    let applied: Vec<AppliedAdjustment> = metric
        .adjustments
        .iter()
        .filter(|adjustment| adjustment_applies(adjustment, metric.polarity, raw_value))
        .map(|adjustment| to_applied(adjustment, metric.polarity))
        .collect();

    let total: Decimal = applied.iter().map(|a| a.points).sum();

    let reasoning = if metric.adjustments.is_empty() {
        "No threshold adjustments configured".to_string()
    } else if applied.is_empty() {
        format!(
            "Raw value {} triggers none of {} threshold adjustments",
            raw_value.normalize(),
            metric.adjustments.len()
        )
    } else {
        let parts: Vec<String> = applied
            .iter()
            .map(|a| format!("{:+} ({})", a.points.normalize(), a.reason))
            .collect();
        format!("Raw value {}: {}", raw_value.normalize(), parts.join(", "))
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "threshold_adjustments".to_string(),
        rule_name: "Threshold Adjustments".to_string(),
        metric_code: Some(metric_code.to_string()),
        input: serde_json::json!({
            "raw_value": raw_value.normalize().to_string(),
            "configured": metric.adjustments.len()
        }),
        output: serde_json::json!({
            "applied": applied.len(),
            "total": total.normalize().to_string()
        }),
        reasoning,
    };

    AdjustmentResult {
        applied,
        total,
        audit_step,
    }
}

fn to_applied(adjustment: &Adjustment, polarity: Polarity) -> AppliedAdjustment {
    let (source, points, comparison) = match (adjustment.kind, polarity) {
        (AdjustmentKind::Bonus, Polarity::HigherIsBetter) => {
            (AdjustmentSource::Bonus, adjustment.points, "at or above")
        }
        (AdjustmentKind::Bonus, Polarity::LowerIsBetter) => {
            (AdjustmentSource::Bonus, adjustment.points, "at or below")
        }
        (AdjustmentKind::Penalty, Polarity::HigherIsBetter) => {
            (AdjustmentSource::Penalty, -adjustment.points, "below")
        }
        (AdjustmentKind::Penalty, Polarity::LowerIsBetter) => {
            (AdjustmentSource::Penalty, -adjustment.points, "above")
        }
    };

    let reason = if adjustment.reason.is_empty() {
        format!("{} {}", comparison, adjustment.threshold.normalize())
    } else {
        adjustment.reason.clone()
    };

    AppliedAdjustment {
        source,
        points,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{adjustment, metric};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn productivity() -> MetricDefinition {
        let mut m = metric(Polarity::HigherIsBetter, "0.30", "100", "110");
        m.adjustments = vec![
            adjustment(AdjustmentKind::Bonus, "110", "5"),
            adjustment(AdjustmentKind::Penalty, "60", "10"),
        ];
        m
    }

    fn error_rate() -> MetricDefinition {
        let mut m = metric(Polarity::LowerIsBetter, "0.15", "2", "100");
        m.adjustments = vec![
            adjustment(AdjustmentKind::Bonus, "0.5", "5"),
            adjustment(AdjustmentKind::Penalty, "5", "15"),
        ];
        m
    }

    #[test]
    fn test_bonus_applies_at_threshold() {
        let result = apply_adjustments("productivity", dec("110"), &productivity(), 1);
        assert_eq!(result.total, dec("5"));
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].source, AdjustmentSource::Bonus);
    }

    #[test]
    fn test_bonus_not_applied_just_below_threshold() {
        let result = apply_adjustments("productivity", dec("109.99"), &productivity(), 1);
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_penalty_applies_just_below_threshold() {
        let result = apply_adjustments("productivity", dec("59.99"), &productivity(), 1);
        assert_eq!(result.total, dec("-10"));
        assert_eq!(result.applied[0].source, AdjustmentSource::Penalty);
    }

    #[test]
    fn test_penalty_not_applied_at_threshold() {
        let result = apply_adjustments("productivity", dec("60"), &productivity(), 1);
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_lower_is_better_bonus_at_threshold() {
        let result = apply_adjustments("error_rate", dec("0.5"), &error_rate(), 1);
        assert_eq!(result.total, dec("5"));
    }

    #[test]
    fn test_lower_is_better_penalty_above_threshold() {
        let at = apply_adjustments("error_rate", dec("5"), &error_rate(), 1);
        assert!(at.applied.is_empty());

        let above = apply_adjustments("error_rate", dec("5.01"), &error_rate(), 1);
        assert_eq!(above.total, dec("-15"));
    }

    #[test]
    fn test_multiple_adjustments_sum() {
        let mut m = productivity();
        m.adjustments.push(adjustment(AdjustmentKind::Bonus, "100", "2"));
        let result = apply_adjustments("productivity", dec("120"), &m, 1);
        assert_eq!(result.total, dec("7"));
        assert_eq!(result.applied.len(), 2);
    }

    #[test]
    fn test_no_adjustments_configured() {
        let m = metric(Polarity::HigherIsBetter, "0.15", "90", "100");
        let result = apply_adjustments("teamwork", dec("10"), &m, 4);
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.audit_step.step_number, 4);
        assert!(result.audit_step.reasoning.contains("No threshold adjustments"));
    }

    #[test]
    fn test_default_reason_describes_threshold() {
        let result = apply_adjustments("productivity", dec("30"), &productivity(), 1);
        assert_eq!(result.applied[0].reason, "below 60");
        assert!(result.audit_step.reasoning.contains("-10 (below 60)"));
    }
}
