//! Configuration types for the scoring model.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PointsError, PointsResult};
use crate::models::Grade;

/// Metadata about the scoring model, from `model.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetadata {
    /// The model code (e.g., "PERF-2025").
    pub code: String,
    /// The human-readable name of the model.
    pub name: String,
    /// The version or effective date of the model.
    pub version: String,
    /// A short description of the model.
    #[serde(default)]
    pub description: String,
    /// Operational policy for records.
    pub policy: Policy,
}

/// Limits and rates applied by the record store.
#[derive(Debug, Clone, Deserialize)]
pub struct Policy {
    /// Points awarded per approved work log hour when the reviewer gives none.
    pub work_log_points_per_hour: Decimal,
    /// Upper bound on the hours a single work log may claim.
    pub max_work_log_hours: Decimal,
    /// Largest accepted attachment, in bytes.
    pub attachment_max_bytes: u64,
    /// MIME types accepted for attachments.
    pub allowed_content_types: Vec<String>,
}

/// Which direction of a raw value is favourable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Larger raw values score higher (e.g. tasks completed).
    HigherIsBetter,
    /// Smaller raw values score higher (e.g. error rate).
    LowerIsBetter,
}

/// How per-work-log values of a metric combine into one period value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Add all values.
    Sum,
    /// Arithmetic mean of all values.
    #[default]
    Average,
    /// Value from the most recent work date.
    Latest,
}

/// Whether an adjustment adds or removes points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Added when the raw value is on the favourable side of the threshold.
    Bonus,
    /// Subtracted when the raw value is on the unfavourable side.
    Penalty,
}

/// A fixed bonus or penalty keyed on a raw-value threshold.
#[derive(Debug, Clone, Deserialize)]
pub struct Adjustment {
    /// Bonus or penalty.
    pub kind: AdjustmentKind,
    /// The raw value the comparison is made against.
    pub threshold: Decimal,
    /// Score points added (bonus) or removed (penalty).
    pub points: Decimal,
    /// Human-readable reason recorded in the audit trace.
    #[serde(default)]
    pub reason: String,
}

/// A bonus that applies only when another metric falls inside a band.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalBonus {
    /// The auxiliary metric that gates the bonus.
    pub gate_metric: String,
    /// Inclusive lower bound on the gate metric's raw value.
    #[serde(default)]
    pub at_least: Option<Decimal>,
    /// Inclusive upper bound on the gate metric's raw value.
    #[serde(default)]
    pub at_most: Option<Decimal>,
    /// Score points added when the gate passes.
    pub points: Decimal,
    /// Human-readable reason recorded in the audit trace.
    #[serde(default)]
    pub reason: String,
}

/// Definition of one scored metric.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricDefinition {
    /// The human-readable name of the metric.
    pub name: String,
    /// The unit raw values are reported in.
    #[serde(default)]
    pub unit: String,
    /// Which direction is favourable.
    pub polarity: Polarity,
    /// Relative weight in the overall score.
    pub weight: Decimal,
    /// The raw value that scores exactly 100.
    pub target: Decimal,
    /// The ceiling for the metric score.
    pub max_score: Decimal,
    /// How work log values combine for a review period.
    #[serde(default)]
    pub aggregation: Aggregation,
    /// Threshold bonuses and penalties.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    /// Bonuses gated on auxiliary metrics.
    #[serde(default)]
    pub conditional_bonuses: Vec<ConditionalBonus>,
}

/// Metrics configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Map of metric code to definition.
    pub metrics: BTreeMap<String, MetricDefinition>,
}

/// Inclusive lower bounds for grades A to D; anything below `d` is E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCutoffs {
    /// Lowest score graded A.
    pub a: Decimal,
    /// Lowest score graded B.
    pub b: Decimal,
    /// Lowest score graded C.
    pub c: Decimal,
    /// Lowest score graded D.
    pub d: Decimal,
}

/// Points credited for each overall grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradePoints {
    /// Points for an A.
    pub a: Decimal,
    /// Points for a B.
    pub b: Decimal,
    /// Points for a C.
    pub c: Decimal,
    /// Points for a D.
    pub d: Decimal,
    /// Points for an E.
    pub e: Decimal,
}

impl GradePoints {
    /// Returns the points for a grade.
    pub fn for_grade(&self, grade: Grade) -> Decimal {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
            Grade::E => self.e,
        }
    }
}

/// Grades configuration from grades.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct GradesConfig {
    /// Score cutoffs.
    pub cutoffs: GradeCutoffs,
    /// Points per grade.
    pub points: GradePoints,
}

/// The complete, validated scoring model.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    metadata: ModelMetadata,
    metrics: BTreeMap<String, MetricDefinition>,
    grades: GradesConfig,
}

impl ScoringConfig {
    /// Creates a scoring model from its parts, rejecting unusable settings.
    pub fn new(
        metadata: ModelMetadata,
        metrics: BTreeMap<String, MetricDefinition>,
        grades: GradesConfig,
    ) -> PointsResult<Self> {
        validate_policy(&metadata.policy)?;
        validate_metrics(&metrics)?;
        validate_cutoffs(&grades.cutoffs)?;

        Ok(Self {
            metadata,
            metrics,
            grades,
        })
    }

    /// Returns the model metadata.
    pub fn model(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Returns the record policy.
    pub fn policy(&self) -> &Policy {
        &self.metadata.policy
    }

    /// Returns all metric definitions, ordered by code.
    pub fn metrics(&self) -> &BTreeMap<String, MetricDefinition> {
        &self.metrics
    }

    /// Returns the grade configuration.
    pub fn grades(&self) -> &GradesConfig {
        &self.grades
    }

    /// Gets a metric definition by code.
    pub fn metric(&self, code: &str) -> PointsResult<&MetricDefinition> {
        self.metrics
            .get(code)
            .ok_or_else(|| PointsError::MetricNotFound {
                code: code.to_string(),
            })
    }
}

fn invalid(message: impl Into<String>) -> PointsError {
    PointsError::InvalidConfig {
        message: message.into(),
    }
}

fn validate_policy(policy: &Policy) -> PointsResult<()> {
    if policy.work_log_points_per_hour < Decimal::ZERO {
        return Err(invalid("work_log_points_per_hour must not be negative"));
    }
    if policy.max_work_log_hours <= Decimal::ZERO {
        return Err(invalid("max_work_log_hours must be positive"));
    }
    Ok(())
}

fn validate_metrics(metrics: &BTreeMap<String, MetricDefinition>) -> PointsResult<()> {
    if metrics.is_empty() {
        return Err(invalid("at least one metric must be defined"));
    }

    let mut total_weight = Decimal::ZERO;
    for (code, metric) in metrics {
        if metric.target <= Decimal::ZERO {
            return Err(invalid(format!("metric '{}': target must be positive", code)));
        }
        if metric.max_score <= Decimal::ZERO {
            return Err(invalid(format!(
                "metric '{}': max_score must be positive",
                code
            )));
        }
        if metric.weight < Decimal::ZERO {
            return Err(invalid(format!(
                "metric '{}': weight must not be negative",
                code
            )));
        }
        total_weight += metric.weight;

        if metric.adjustments.iter().any(|a| a.points < Decimal::ZERO) {
            return Err(invalid(format!(
                "metric '{}': adjustment points must not be negative",
                code
            )));
        }

        for bonus in &metric.conditional_bonuses {
            if !metrics.contains_key(&bonus.gate_metric) {
                return Err(invalid(format!(
                    "metric '{}': unknown gate metric '{}'",
                    code, bonus.gate_metric
                )));
            }
            if bonus.points < Decimal::ZERO {
                return Err(invalid(format!(
                    "metric '{}': conditional bonus points must not be negative",
                    code
                )));
            }
            match (bonus.at_least, bonus.at_most) {
                (None, None) => {
                    return Err(invalid(format!(
                        "metric '{}': conditional bonus on '{}' needs at_least or at_most",
                        code, bonus.gate_metric
                    )));
                }
                (Some(low), Some(high)) if low > high => {
                    return Err(invalid(format!(
                        "metric '{}': conditional bonus on '{}' has at_least above at_most",
                        code, bonus.gate_metric
                    )));
                }
                _ => {}
            }
        }
    }

    if total_weight <= Decimal::ZERO {
        return Err(invalid("metric weights must sum to a positive value"));
    }
    Ok(())
}

fn validate_cutoffs(cutoffs: &GradeCutoffs) -> PointsResult<()> {
    if cutoffs.a > cutoffs.b && cutoffs.b > cutoffs.c && cutoffs.c > cutoffs.d {
        Ok(())
    } else {
        Err(invalid("grade cutoffs must be strictly descending from a to d"))
    }
}
