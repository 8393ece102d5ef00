//! Scorecard grading.
//!
//! Runs every scoring rule over a [`Scorecard`] in metric code order and
//! assembles the [`GradeReport`] with its audit trace.

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Instant;
use uuid::Uuid;

use crate::config::{MetricDefinition, ScoringConfig};
use crate::error::{PointsError, PointsResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, GradeReport, MetricGrade, Scorecard,
};

use super::adjustments::apply_adjustments;
use super::aggregate::aggregate_grades;
use super::base_score::calculate_base_score;
use super::conditional_bonus::apply_conditional_bonuses;
use super::grade_cutoffs::{grade_for_score, round_score};

/// The result of grading one metric, with the audit steps it produced.
#[derive(Debug, Clone)]
pub struct MetricGradeResult {
    /// The metric outcome.
    pub metric_grade: MetricGrade,
    /// Base score, adjustment, conditional bonus and grade steps.
    pub audit_steps: Vec<AuditStep>,
}

/// Grades one metric.
///
/// `reported` holds every raw value on the scorecard so conditional bonuses
/// can look at their gate metrics.
pub fn grade_metric(
    metric_code: &str,
    raw_value: Decimal,
    target: Decimal,
    metric: &MetricDefinition,
    reported: &BTreeMap<String, Decimal>,
    config: &ScoringConfig,
    step_number: u32,
) -> MetricGradeResult {
    let base = calculate_base_score(metric_code, raw_value, target, metric, step_number);
    let adjustments = apply_adjustments(metric_code, raw_value, metric, step_number + 1);
    let conditional = apply_conditional_bonuses(metric_code, metric, reported, step_number + 2);

    let final_score = round_score(clamped_sum(
        base.base_score,
        &[adjustments.total, conditional.total],
        metric.max_score,
    ));
    let grade = grade_for_score(final_score, &config.grades().cutoffs);

    let grade_step = AuditStep {
        step_number: step_number + 3,
        rule_id: "metric_grade".to_string(),
        rule_name: "Metric Grade".to_string(),
        metric_code: Some(metric_code.to_string()),
        input: serde_json::json!({
            "base_score": round_score(base.base_score).normalize().to_string(),
            "adjustments": adjustments.total.normalize().to_string(),
            "conditional_bonuses": conditional.total.normalize().to_string(),
            "max_score": metric.max_score.normalize().to_string()
        }),
        output: serde_json::json!({
            "final_score": final_score.normalize().to_string(),
            "grade": grade.as_str()
        }),
        reasoning: format!(
            "{} {:+} {:+} = {} (clamped to 0..={}) -> grade {}",
            round_score(base.base_score).normalize(),
            adjustments.total.normalize(),
            conditional.total.normalize(),
            final_score.normalize(),
            metric.max_score.normalize(),
            grade
        ),
    };

    let mut applied = adjustments.applied;
    applied.extend(conditional.applied);

    MetricGradeResult {
        metric_grade: MetricGrade {
            metric_code: metric_code.to_string(),
            raw_value,
            target,
            weight: metric.weight,
            base_score: round_score(base.base_score),
            adjustments: applied,
            final_score,
            grade,
        },
        audit_steps: vec![
            base.audit_step,
            adjustments.audit_step,
            conditional.audit_step,
            grade_step,
        ],
    }
}

/// Adds `parts` to `base` and clamps the result to `[0, max_score]`.
///
/// A sum that leaves the decimal range lands on the bound it overflowed
/// towards.
fn clamped_sum(base: Decimal, parts: &[Decimal], max_score: Decimal) -> Decimal {
    let mut sum = base;
    for part in parts {
        sum = match sum.checked_add(*part) {
            Some(sum) => sum,
            None if part.is_sign_negative() => return Decimal::ZERO,
            None => return max_score,
        };
    }
    sum.max(Decimal::ZERO).min(max_score)
}

/// Grades a scorecard against the scoring model.
///
/// Metrics are graded in code order. Configured metrics missing from the
/// scorecard produce a `MISSING_METRIC` warning and are left out of the
/// weighted average.
///
/// # Errors
///
/// - `Validation` if the period ends before it starts
/// - `MetricNotFound` for a metric or target code the model doesn't define
/// - `InvalidMetricValue` for a negative raw value or a non-positive target
/// - `CalculationError` if the scorecard has no metrics
///
/// # Example
///
/// ```no_run
/// use points_engine::config::ConfigLoader;
/// use points_engine::models::{ReviewPeriod, Scorecard};
/// use points_engine::scoring::grade_scorecard;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let loader = ConfigLoader::load("./config/scoring")?;
/// let scorecard = Scorecard {
///     employee_id: "emp_001".to_string(),
///     period: ReviewPeriod::new(
///         NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
///     )?,
///     metrics: BTreeMap::from([("quality".to_string(), Decimal::from(97))]),
///     targets: BTreeMap::new(),
/// };
/// let report = grade_scorecard(&scorecard, loader.config())?;
/// println!("{} -> {}", report.summary.overall_score, report.summary.overall_grade);
/// # Ok::<(), points_engine::error::PointsError>(())
/// ```
pub fn grade_scorecard(scorecard: &Scorecard, config: &ScoringConfig) -> PointsResult<GradeReport> {
    let start_time = Instant::now();
    validate_scorecard(scorecard, config)?;

    let mut metric_grades = Vec::with_capacity(scorecard.metrics.len());
    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step_number: u32 = 1;

    for (code, metric) in config.metrics() {
        let Some(raw_value) = scorecard.metrics.get(code).copied() else {
            warnings.push(AuditWarning {
                code: "MISSING_METRIC".to_string(),
                message: format!(
                    "Metric '{}' was not reported; its weight is redistributed",
                    code
                ),
                severity: "medium".to_string(),
            });
            continue;
        };

        let target = scorecard
            .targets
            .get(code)
            .copied()
            .unwrap_or(metric.target);

        let result = grade_metric(
            code,
            raw_value,
            target,
            metric,
            &scorecard.metrics,
            config,
            step_number,
        );
        step_number += result.audit_steps.len() as u32;
        steps.extend(result.audit_steps);
        metric_grades.push(result.metric_grade);
    }

    let aggregate = aggregate_grades(&metric_grades, config.grades(), step_number)?;
    steps.push(aggregate.audit_step);

    let model = config.model();
    Ok(GradeReport {
        report_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        model: format!("{}@{}", model.code, model.version),
        employee_id: scorecard.employee_id.clone(),
        period: scorecard.period,
        metric_grades,
        summary: aggregate.summary,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}

fn validate_scorecard(scorecard: &Scorecard, config: &ScoringConfig) -> PointsResult<()> {
    scorecard.period.validate()?;

    if scorecard.metrics.is_empty() {
        return Err(PointsError::CalculationError {
            message: "scorecard has no metric values".to_string(),
        });
    }

    for (code, value) in &scorecard.metrics {
        config.metric(code)?;
        if *value < Decimal::ZERO {
            return Err(PointsError::InvalidMetricValue {
                metric: code.clone(),
                message: format!("raw value {} must not be negative", value),
            });
        }
    }

    for (code, target) in &scorecard.targets {
        config.metric(code)?;
        if *target <= Decimal::ZERO {
            return Err(PointsError::InvalidMetricValue {
                metric: code.clone(),
                message: format!("target {} must be greater than zero", target),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::sample_config;
    use crate::models::{AdjustmentSource, Grade, ReviewPeriod};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scorecard(pairs: &[(&str, &str)]) -> Scorecard {
        Scorecard {
            employee_id: "emp_001".to_string(),
            period: ReviewPeriod {
                start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            },
            metrics: pairs
                .iter()
                .map(|(code, value)| (code.to_string(), dec(value)))
                .collect(),
            targets: BTreeMap::new(),
        }
    }

    fn on_target() -> Scorecard {
        scorecard(&[
            ("productivity", "100"),
            ("quality", "95"),
            ("error_rate", "2"),
            ("teamwork", "90"),
            ("resource_utilization", "85"),
        ])
    }

    #[test]
    fn test_on_target_employee_grades_a() {
        let report = grade_scorecard(&on_target(), &sample_config()).unwrap();

        // Productivity: 100 base + 5 teamwork + 3 utilisation = 108
        let productivity = report.metric("productivity").unwrap();
        assert_eq!(productivity.base_score, dec("100"));
        assert_eq!(productivity.final_score, dec("108"));
        assert_eq!(productivity.adjustments.len(), 2);
        assert!(productivity
            .adjustments
            .iter()
            .all(|a| a.source == AdjustmentSource::Conditional));

        // (0.30 * 108 + 0.70 * 100) / 1.00
        assert_eq!(report.summary.overall_score, dec("102.40"));
        assert_eq!(report.summary.overall_grade, Grade::A);
        assert_eq!(report.summary.grade_counts.get(Grade::A), 5);
        assert_eq!(report.summary.points, dec("10"));
        assert!(report.audit_trace.warnings.is_empty());
        assert_eq!(report.model, "TEST@test");
    }

    #[test]
    fn test_audit_trace_has_four_steps_per_metric_plus_overall() {
        let report = grade_scorecard(&on_target(), &sample_config()).unwrap();
        let steps = &report.audit_trace.steps;

        assert_eq!(steps.len(), 5 * 4 + 1);
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert_eq!(steps.last().unwrap().rule_id, "overall_grade");
    }

    #[test]
    fn test_metrics_graded_in_code_order() {
        let report = grade_scorecard(&on_target(), &sample_config()).unwrap();
        let codes: Vec<&str> = report
            .metric_grades
            .iter()
            .map(|m| m.metric_code.as_str())
            .collect();
        assert_eq!(
            codes,
            vec!["error_rate", "productivity", "quality", "resource_utilization", "teamwork"]
        );
    }

    #[test]
    fn test_struggling_employee() {
        let report = grade_scorecard(
            &scorecard(&[
                ("productivity", "50"),
                ("quality", "76"),
                ("error_rate", "6"),
                ("teamwork", "70"),
                ("resource_utilization", "60"),
            ]),
            &sample_config(),
        )
        .unwrap();

        // 50 base - 10 penalty; teamwork 70 and utilisation 60 fail their gates
        assert_eq!(report.metric("productivity").unwrap().final_score, dec("40"));
        // 76 / 95 * 100 = 80, - 10 penalty
        assert_eq!(report.metric("quality").unwrap().final_score, dec("70"));
        // 2 / 6 * 100 = 33.33, - 15 penalty
        assert_eq!(report.metric("error_rate").unwrap().final_score, dec("18.33"));
        // 70 / 90 * 100 = 77.78
        assert_eq!(report.metric("teamwork").unwrap().final_score, dec("77.78"));
        assert_eq!(report.metric("teamwork").unwrap().grade, Grade::C);
        // 60 / 85 * 100 = 70.59
        assert_eq!(
            report.metric("resource_utilization").unwrap().final_score,
            dec("70.59")
        );

        let counts = report.summary.grade_counts;
        assert_eq!(counts.get(Grade::C), 3);
        assert_eq!(counts.get(Grade::E), 2);

        // (0.30*40 + 0.25*70 + 0.15*18.33 + 0.15*77.78 + 0.15*70.59) / 1.00
        // = 12 + 17.5 + 2.7495 + 11.667 + 10.5885 = 54.505 -> 54.51
        assert_eq!(report.summary.overall_score, dec("54.51"));
        assert_eq!(report.summary.overall_grade, Grade::E);
        assert_eq!(report.summary.points, Decimal::ZERO);
    }

    #[test]
    fn test_final_score_clamped_to_max() {
        let report = grade_scorecard(
            &scorecard(&[("productivity", "130"), ("teamwork", "95")]),
            &sample_config(),
        )
        .unwrap();

        // 110 capped base + 5 bonus + 5 teamwork gate = 120, clamped to 110
        let productivity = report.metric("productivity").unwrap();
        assert_eq!(productivity.base_score, dec("110"));
        assert_eq!(productivity.final_score, dec("110"));
    }

    #[test]
    fn test_final_score_clamped_to_zero() {
        let report =
            grade_scorecard(&scorecard(&[("productivity", "5")]), &sample_config()).unwrap();
        let productivity = report.metric("productivity").unwrap();
        assert_eq!(productivity.final_score, Decimal::ZERO);
        assert_eq!(productivity.grade, Grade::E);
    }

    #[test]
    fn test_tiny_error_rate_grades_at_max() {
        let card = scorecard(&[("error_rate", "0.0000000000000000000000000001")]);
        let report = grade_scorecard(&card, &sample_config()).unwrap();
        let error_rate = report.metric("error_rate").unwrap();

        assert_eq!(error_rate.final_score, dec("100"));
        assert_eq!(report.summary.overall_grade, Grade::A);
    }

    #[test]
    fn test_huge_value_with_small_target_grades_at_max() {
        let mut card = scorecard(&[]);
        card.metrics.insert("productivity".to_string(), Decimal::MAX);
        card.targets.insert("productivity".to_string(), dec("0.01"));
        let report = grade_scorecard(&card, &sample_config()).unwrap();

        assert_eq!(report.metric("productivity").unwrap().final_score, dec("110"));
    }

    #[test]
    fn test_clamped_sum_overflow_lands_on_bound() {
        let max_score = dec("110");
        assert_eq!(clamped_sum(Decimal::MAX, &[Decimal::ONE], max_score), max_score);
        assert_eq!(clamped_sum(Decimal::MIN, &[-Decimal::ONE], max_score), Decimal::ZERO);
        assert_eq!(clamped_sum(dec("95"), &[dec("10"), dec("-20")], max_score), dec("85"));
    }

    #[test]
    fn test_missing_metrics_warn_and_redistribute() {
        let report = grade_scorecard(&scorecard(&[("quality", "95")]), &sample_config()).unwrap();

        assert_eq!(report.metric_grades.len(), 1);
        assert_eq!(report.audit_trace.warnings.len(), 4);
        assert!(report
            .audit_trace
            .warnings
            .iter()
            .all(|w| w.code == "MISSING_METRIC"));
        assert_eq!(report.summary.overall_score, dec("100"));
    }

    #[test]
    fn test_target_override_changes_score() {
        let mut card = scorecard(&[("productivity", "80")]);
        card.targets.insert("productivity".to_string(), dec("80"));

        let report = grade_scorecard(&card, &sample_config()).unwrap();
        let productivity = report.metric("productivity").unwrap();
        assert_eq!(productivity.target, dec("80"));
        assert_eq!(productivity.base_score, dec("100"));
    }

    #[test]
    fn test_unknown_metric_is_error() {
        let result = grade_scorecard(&scorecard(&[("charisma", "10")]), &sample_config());
        match result {
            Err(PointsError::MetricNotFound { code }) => assert_eq!(code, "charisma"),
            other => panic!("Expected MetricNotFound, got {:?}", other.map(|r| r.report_id)),
        }
    }

    #[test]
    fn test_unknown_target_metric_is_error() {
        let mut card = on_target();
        card.targets.insert("charisma".to_string(), dec("10"));
        assert!(matches!(
            grade_scorecard(&card, &sample_config()),
            Err(PointsError::MetricNotFound { .. })
        ));
    }

    #[test]
    fn test_negative_value_is_error() {
        let result = grade_scorecard(&scorecard(&[("quality", "-1")]), &sample_config());
        assert!(matches!(result, Err(PointsError::InvalidMetricValue { .. })));
    }

    #[test]
    fn test_zero_target_override_is_error() {
        let mut card = on_target();
        card.targets.insert("quality".to_string(), Decimal::ZERO);
        assert!(matches!(
            grade_scorecard(&card, &sample_config()),
            Err(PointsError::InvalidMetricValue { .. })
        ));
    }

    #[test]
    fn test_empty_scorecard_is_error() {
        let result = grade_scorecard(&scorecard(&[]), &sample_config());
        assert!(matches!(result, Err(PointsError::CalculationError { .. })));
    }

    #[test]
    fn test_inverted_period_is_error() {
        let mut card = on_target();
        card.period.end_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(matches!(
            grade_scorecard(&card, &sample_config()),
            Err(PointsError::Validation { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_final_scores_stay_within_bounds(
            productivity in 0u32..50_000,
            quality in 0u32..20_000,
            error_rate in 0u32..2_000,
            teamwork in 0u32..15_000,
        ) {
            let config = sample_config();
            let mut card = scorecard(&[]);
            card.metrics.insert("productivity".to_string(), Decimal::new(productivity as i64, 2));
            card.metrics.insert("quality".to_string(), Decimal::new(quality as i64, 2));
            card.metrics.insert("error_rate".to_string(), Decimal::new(error_rate as i64, 2));
            card.metrics.insert("teamwork".to_string(), Decimal::new(teamwork as i64, 2));

            let report = grade_scorecard(&card, &config).unwrap();
            for graded in &report.metric_grades {
                let max_score = config.metric(&graded.metric_code).unwrap().max_score;
                prop_assert!(graded.final_score >= Decimal::ZERO);
                prop_assert!(graded.final_score <= max_score);
                prop_assert_eq!(graded.grade, grade_for_score(graded.final_score, &config.grades().cutoffs));
            }
        }

        #[test]
        fn prop_any_representable_value_grades_without_panicking(
            lo in any::<u32>(),
            mid in any::<u32>(),
            hi in any::<u32>(),
            scale in 0u32..=28,
        ) {
            let config = sample_config();
            let value = Decimal::from_parts(lo, mid, hi, false, scale);
            let mut card = scorecard(&[]);
            for code in config.metrics().keys() {
                card.metrics.insert(code.clone(), value);
            }

            let report = grade_scorecard(&card, &config).unwrap();
            prop_assert!(report.summary.overall_score >= Decimal::ZERO);
            for graded in &report.metric_grades {
                let max_score = config.metric(&graded.metric_code).unwrap().max_score;
                prop_assert!(graded.final_score <= max_score);
            }
        }
    }
}
