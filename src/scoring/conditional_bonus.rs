//! Bonuses gated on auxiliary metrics.
//!
//! A conditional bonus raises one metric's score only when a different
//! metric (teamwork, resource utilisation, ...) was reported inside a band.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::{ConditionalBonus, MetricDefinition};
use crate::models::{AdjustmentSource, AppliedAdjustment, AuditStep};

/// The result of evaluating a metric's conditional bonuses.
#[derive(Debug, Clone)]
pub struct ConditionalBonusResult {
    /// Bonuses whose gate passed, in configuration order.
    pub applied: Vec<AppliedAdjustment>,
    /// Sum of the applied bonuses.
    pub total: Decimal,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
}

/// Why a gate did or did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The gate metric was reported inside the band.
    Passed,
    /// The gate metric was reported outside the band.
    OutOfBand,
    /// The gate metric was not reported.
    NotReported,
}

/// Checks a bonus gate against the reported raw values.
///
/// Both bounds are inclusive; a missing bound is unbounded on that side.
pub fn evaluate_gate(bonus: &ConditionalBonus, reported: &BTreeMap<String, Decimal>) -> GateOutcome {
    let Some(value) = reported.get(&bonus.gate_metric).copied() else {
        return GateOutcome::NotReported;
    };

    let above_floor = bonus.at_least.is_none_or(|low| value >= low);
    let below_ceiling = bonus.at_most.is_none_or(|high| value <= high);

    if above_floor && below_ceiling {
        GateOutcome::Passed
    } else {
        GateOutcome::OutOfBand
    }
}

/// Evaluates every conditional bonus configured for a metric.
///
/// `reported` holds the raw values of every metric on the scorecard.
pub fn apply_conditional_bonuses(
    metric_code: &str,
    metric: &MetricDefinition,
    reported: &BTreeMap<String, Decimal>,
    step_number: u32,
) -> ConditionalBonusResult {
    let mut applied = Vec::new();
    let mut notes = Vec::new();

    for bonus in &metric.conditional_bonuses {
        let band = describe_band(bonus);
        match evaluate_gate(bonus, reported) {
            GateOutcome::Passed => {
                let reason = if bonus.reason.is_empty() {
                    format!("{} {}", bonus.gate_metric, band)
                } else {
                    bonus.reason.clone()
                };
                notes.push(format!(
                    "{} {} passed: +{}",
                    bonus.gate_metric,
                    band,
                    bonus.points.normalize()
                ));
                applied.push(AppliedAdjustment {
                    source: AdjustmentSource::Conditional,
                    points: bonus.points,
                    reason,
                });
            }
            GateOutcome::OutOfBand => {
                notes.push(format!("{} not {}", bonus.gate_metric, band));
            }
            GateOutcome::NotReported => {
                notes.push(format!("{} not reported", bonus.gate_metric));
            }
        }
    }

    let total: Decimal = applied.iter().map(|a| a.points).sum();

    let reasoning = if metric.conditional_bonuses.is_empty() {
        "No conditional bonuses configured".to_string()
    } else {
        notes.join("; ")
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "conditional_bonuses".to_string(),
        rule_name: "Conditional Bonuses".to_string(),
        metric_code: Some(metric_code.to_string()),
        input: serde_json::json!({
            "gates": metric
                .conditional_bonuses
                .iter()
                .map(|b| serde_json::json!({
                    "gate_metric": b.gate_metric,
                    "gate_value": reported.get(&b.gate_metric).map(|v| v.normalize().to_string()),
                }))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "applied": applied.len(),
            "total": total.normalize().to_string()
        }),
        reasoning,
    };

    ConditionalBonusResult {
        applied,
        total,
        audit_step,
    }
}

fn describe_band(bonus: &ConditionalBonus) -> String {
    match (bonus.at_least, bonus.at_most) {
        (Some(low), Some(high)) => format!("within {}..={}", low.normalize(), high.normalize()),
        (Some(low), None) => format!(">= {}", low.normalize()),
        (None, Some(high)) => format!("<= {}", high.normalize()),
        (None, None) => "unbounded".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Polarity;
    use crate::config::test_support::metric;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bonus(gate: &str, at_least: Option<&str>, at_most: Option<&str>, points: &str) -> ConditionalBonus {
        ConditionalBonus {
            gate_metric: gate.to_string(),
            at_least: at_least.map(dec),
            at_most: at_most.map(dec),
            points: dec(points),
            reason: String::new(),
        }
    }

    fn productivity() -> MetricDefinition {
        let mut m = metric(Polarity::HigherIsBetter, "0.30", "100", "110");
        m.conditional_bonuses = vec![
            bonus("teamwork", Some("85"), None, "5"),
            bonus("resource_utilization", Some("70"), Some("95"), "3"),
        ];
        m
    }

    fn reported(pairs: &[(&str, &str)]) -> BTreeMap<String, Decimal> {
        pairs
            .iter()
            .map(|(code, value)| (code.to_string(), dec(value)))
            .collect()
    }

    #[test]
    fn test_both_gates_pass() {
        let values = reported(&[("teamwork", "90"), ("resource_utilization", "85")]);
        let result = apply_conditional_bonuses("productivity", &productivity(), &values, 3);
        assert_eq!(result.total, dec("8"));
        assert_eq!(result.applied.len(), 2);
        assert!(result
            .applied
            .iter()
            .all(|a| a.source == AdjustmentSource::Conditional));
    }

    #[test]
    fn test_gate_floor_is_inclusive() {
        let values = reported(&[("teamwork", "85")]);
        let result = apply_conditional_bonuses("productivity", &productivity(), &values, 3);
        assert_eq!(result.total, dec("5"));

        let values = reported(&[("teamwork", "84.99")]);
        let result = apply_conditional_bonuses("productivity", &productivity(), &values, 3);
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_gate_ceiling_is_inclusive() {
        let values = reported(&[("resource_utilization", "95")]);
        let result = apply_conditional_bonuses("productivity", &productivity(), &values, 3);
        assert_eq!(result.total, dec("3"));

        let values = reported(&[("resource_utilization", "95.01")]);
        let result = apply_conditional_bonuses("productivity", &productivity(), &values, 3);
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("resource_utilization not within 70..=95"));
    }

    #[test]
    fn test_missing_gate_metric_never_applies() {
        let values = reported(&[]);
        let result = apply_conditional_bonuses("productivity", &productivity(), &values, 3);
        assert!(result.applied.is_empty());
        assert!(result.audit_step.reasoning.contains("teamwork not reported"));
    }

    #[test]
    fn test_evaluate_gate_outcomes() {
        let gate = bonus("teamwork", None, Some("50"), "1");
        assert_eq!(
            evaluate_gate(&gate, &reported(&[("teamwork", "50")])),
            GateOutcome::Passed
        );
        assert_eq!(
            evaluate_gate(&gate, &reported(&[("teamwork", "51")])),
            GateOutcome::OutOfBand
        );
        assert_eq!(evaluate_gate(&gate, &reported(&[])), GateOutcome::NotReported);
    }

    #[test]
    fn test_no_bonuses_configured() {
        let m = metric(Polarity::HigherIsBetter, "0.15", "90", "100");
        let result = apply_conditional_bonuses("teamwork", &m, &reported(&[]), 2);
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.audit_step.reasoning, "No conditional bonuses configured");
    }
}
