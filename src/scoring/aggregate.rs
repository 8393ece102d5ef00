//! Aggregation of metric grades into an overall grade, and of per-log
//! metric values into one value per review period.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{Aggregation, GradesConfig};
use crate::error::{PointsError, PointsResult};
use crate::models::{AuditStep, GradeCounts, GradeSummary, MetricGrade};

use super::grade_cutoffs::{grade_for_score, round_score};

/// The result of aggregating metric grades.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// Overall score, grade, counts and points.
    pub summary: GradeSummary,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Combines metric grades into a weighted overall grade.
///
/// The overall score is `Σ(weight × final_score) / Σ(weight)` over the
/// graded metrics, so the weights of missing metrics are redistributed.
/// Grade counts tally every metric grade regardless of weight.
///
/// Returns a `CalculationError` when there is nothing to aggregate or all
/// graded metrics carry zero weight.
pub fn aggregate_grades(
    metric_grades: &[MetricGrade],
    grades: &GradesConfig,
    step_number: u32,
) -> PointsResult<AggregateResult> {
    if metric_grades.is_empty() {
        return Err(PointsError::CalculationError {
            message: "no metrics to aggregate".to_string(),
        });
    }

    let total_weight: Decimal = metric_grades.iter().map(|m| m.weight).sum();
    if total_weight <= Decimal::ZERO {
        return Err(PointsError::CalculationError {
            message: "graded metrics carry no weight".to_string(),
        });
    }

    let weighted_sum: Decimal = metric_grades
        .iter()
        .map(|m| m.weight * m.final_score)
        .sum();
    let overall_score = round_score(weighted_sum / total_weight);
    let overall_grade = grade_for_score(overall_score, &grades.cutoffs);
    let grade_counts: GradeCounts = metric_grades.iter().map(|m| m.grade).collect();
    let points = grades.points.for_grade(overall_grade);

    let audit_step = AuditStep {
        step_number,
        rule_id: "overall_grade".to_string(),
        rule_name: "Weighted Overall Grade".to_string(),
        metric_code: None,
        input: serde_json::json!({
            "metrics": metric_grades
                .iter()
                .map(|m| serde_json::json!({
                    "metric_code": m.metric_code,
                    "weight": m.weight.normalize().to_string(),
                    "final_score": m.final_score.normalize().to_string(),
                }))
                .collect::<Vec<_>>(),
            "total_weight": total_weight.normalize().to_string()
        }),
        output: serde_json::json!({
            "overall_score": overall_score.normalize().to_string(),
            "overall_grade": overall_grade.as_str(),
            "points": points.normalize().to_string()
        }),
        reasoning: format!(
            "{} / {} = {} -> grade {} worth {} points",
            weighted_sum.round_dp(4).normalize(),
            total_weight.normalize(),
            overall_score.normalize(),
            overall_grade,
            points.normalize()
        ),
    };

    Ok(AggregateResult {
        summary: GradeSummary {
            overall_score,
            overall_grade,
            grade_counts,
            points,
        },
        audit_step,
    })
}

/// Combines the values one metric took across several work logs.
///
/// Returns `None` when there are no values.
///
/// # Errors
///
/// `CalculationError` if a `Sum` leaves the decimal range. An average
/// of large values is taken share by share instead.
///
/// ```
/// use chrono::NaiveDate;
/// use points_engine::config::Aggregation;
/// use points_engine::scoring::aggregate_metric_values;
/// use rust_decimal::Decimal;
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap();
/// let values = [(day(1), Decimal::from(40)), (day(2), Decimal::from(60))];
///
/// let combine = |aggregation| aggregate_metric_values("productivity", &values, aggregation).unwrap();
/// assert_eq!(combine(Aggregation::Sum), Some(Decimal::from(100)));
/// assert_eq!(combine(Aggregation::Average), Some(Decimal::from(50)));
/// assert_eq!(combine(Aggregation::Latest), Some(Decimal::from(60)));
/// ```
pub fn aggregate_metric_values(
    metric_code: &str,
    values: &[(NaiveDate, Decimal)],
    aggregation: Aggregation,
) -> PointsResult<Option<Decimal>> {
    if values.is_empty() {
        return Ok(None);
    }

    let value = match aggregation {
        Aggregation::Sum => {
            checked_total(values).ok_or_else(|| PointsError::CalculationError {
                message: format!(
                    "sum of {} logged '{}' values exceeds the decimal range",
                    values.len(),
                    metric_code
                ),
            })?
        }
        Aggregation::Average => {
            let count = Decimal::from(values.len());
            match checked_total(values) {
                Some(sum) => sum / count,
                // Rounding the shares can still push the total past the
                // range; the largest value bounds the average from above.
                None => values
                    .iter()
                    .try_fold(Decimal::ZERO, |total, (_, v)| total.checked_add(*v / count))
                    .unwrap_or_else(|| {
                        values.iter().map(|(_, v)| *v).max().unwrap_or_default()
                    }),
            }
        }
        // Ties on the same date go to the later entry.
        Aggregation::Latest => values
            .iter()
            .enumerate()
            .max_by_key(|(index, (date, _))| (*date, *index))
            .map(|(_, (_, value))| *value)
            .unwrap_or_default(),
    };
    Ok(Some(value))
}

fn checked_total(values: &[(NaiveDate, Decimal)]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |total, (_, value)| total.checked_add(*value))
}
