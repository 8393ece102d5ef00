//! Grade report models for the scoring model.
//!
//! This module contains the [`GradeReport`] type and its associated structures
//! that capture all outputs from grading a scorecard: per-metric grades, the
//! weighted summary, and an audit trace of every rule applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Grade, GradeCounts, ReviewPeriod};

/// Where a score adjustment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSource {
    /// A threshold bonus on the metric itself.
    Bonus,
    /// A threshold penalty on the metric itself.
    Penalty,
    /// A bonus gated on another metric.
    Conditional,
}

/// One bonus or penalty that changed a metric score.
///
/// `points` is signed: penalties are negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    /// Kind of adjustment.
    pub source: AdjustmentSource,
    /// Signed score change.
    pub points: Decimal,
    /// Why the adjustment applied.
    pub reason: String,
}

/// The grading outcome for a single metric.
///
/// # Example
///
/// ```
/// use points_engine::models::{Grade, MetricGrade};
/// use rust_decimal::Decimal;
///
/// let grade = MetricGrade {
///     metric_code: "quality".to_string(),
///     raw_value: Decimal::from(95),
///     target: Decimal::from(95),
///     weight: Decimal::new(25, 2),
///     base_score: Decimal::from(100),
///     adjustments: vec![],
///     final_score: Decimal::from(100),
///     grade: Grade::A,
/// };
/// assert_eq!(grade.grade, Grade::A);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricGrade {
    /// The metric code.
    pub metric_code: String,
    /// The raw value reported.
    pub raw_value: Decimal,
    /// The target the value was scored against.
    pub target: Decimal,
    /// The metric's weight in the overall score.
    pub weight: Decimal,
    /// Score before adjustments, capped to the metric's maximum.
    pub base_score: Decimal,
    /// Adjustments that applied, in evaluation order.
    pub adjustments: Vec<AppliedAdjustment>,
    /// Score after adjustments, clamped and rounded to 2 dp.
    pub final_score: Decimal,
    /// Letter grade for `final_score`.
    pub grade: Grade,
}

/// Aggregated outcome across all graded metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    /// Weighted mean of metric scores, rounded to 2 dp.
    pub overall_score: Decimal,
    /// Letter grade for `overall_score`.
    pub overall_grade: Grade,
    /// Number of metrics at each grade.
    pub grade_counts: GradeCounts,
    /// Points the overall grade is worth.
    pub points: Decimal,
}

/// A single step in the audit trace recording a scoring decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The metric the rule ran against, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_code: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during grading.
///
/// Warnings indicate potential issues that don't prevent grading
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a grading run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of scoring steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during grading.
    pub warnings: Vec<AuditWarning>,
    /// The total grading duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of grading a scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique identifier for this report.
    pub report_id: Uuid,
    /// When the grading was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// The scoring model code and version, e.g. "PERF-2025@2025-07-01".
    pub model: String,
    /// The employee the report is for.
    pub employee_id: String,
    /// The period that was graded.
    pub period: ReviewPeriod,
    /// Per-metric outcomes, ordered by metric code.
    pub metric_grades: Vec<MetricGrade>,
    /// Weighted summary.
    pub summary: GradeSummary,
    /// Complete audit trace of scoring decisions.
    pub audit_trace: AuditTrace,
}

impl GradeReport {
    /// Returns the outcome for one metric, if it was graded.
    pub fn metric(&self, code: &str) -> Option<&MetricGrade> {
        self.metric_grades.iter().find(|m| m.metric_code == code)
    }
}
