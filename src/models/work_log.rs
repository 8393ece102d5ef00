//! Work log records and their review states.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::error::{PointsError, PointsResult};

/// Review state of a work log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkLogStatus {
    /// Submitted and awaiting review.
    Pending,
    /// Accepted by a reviewer; counts towards grading.
    Approved,
    /// Turned down by a reviewer.
    Rejected,
}

impl WorkLogStatus {
    /// Returns the status as written on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkLogStatus::Pending => "pending",
            WorkLogStatus::Approved => "approved",
            WorkLogStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WorkLogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLog {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee who did the work.
    pub employee_id: Uuid,
    /// The day the work was done.
    pub work_date: NaiveDate,
    /// Short summary.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Hours spent.
    pub hours: Decimal,
    /// Raw metric values reported with the log, by metric code.
    pub metrics: BTreeMap<String, Decimal>,
    /// Review state.
    pub status: WorkLogStatus,
    /// When the log was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When the log was reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Who reviewed the log.
    pub reviewed_by: Option<String>,
    /// Reviewer's comment.
    pub review_comment: Option<String>,
    /// Points credited on approval.
    pub points_awarded: Option<Decimal>,
}

impl WorkLog {
    /// Returns true while the log is awaiting review.
    pub fn is_pending(&self) -> bool {
        self.status == WorkLogStatus::Pending
    }
}

/// Input for submitting a work log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkLog {
    /// The employee who did the work.
    pub employee_id: Uuid,
    /// The day the work was done.
    pub work_date: NaiveDate,
    /// Short summary.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Hours spent.
    pub hours: Decimal,
    /// Raw metric values, by metric code.
    #[serde(default)]
    pub metrics: BTreeMap<String, Decimal>,
}

impl NewWorkLog {
    /// Checks the log against the scoring model and record policy.
    pub fn validate(&self, config: &ScoringConfig) -> PointsResult<()> {
        if self.title.trim().is_empty() {
            return Err(PointsError::validation("title", "must not be empty"));
        }
        if self.hours <= Decimal::ZERO {
            return Err(PointsError::validation("hours", "must be greater than zero"));
        }
        let max_hours = config.policy().max_work_log_hours;
        if self.hours > max_hours {
            return Err(PointsError::validation(
                "hours",
                format!("must not exceed {}", max_hours.normalize()),
            ));
        }
        for (code, value) in &self.metrics {
            config.metric(code)?;
            if *value < Decimal::ZERO {
                return Err(PointsError::InvalidMetricValue {
                    metric: code.clone(),
                    message: "must not be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A reviewer's decision on a pending work log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Review {
    /// Who is reviewing.
    pub reviewer: String,
    /// Points to credit on approval; defaults to the per-hour policy rate.
    #[serde(default)]
    pub points: Option<Decimal>,
    /// Comment for the employee; required when rejecting.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Review {
    /// Checks the reviewer is named.
    pub fn validate(&self) -> PointsResult<()> {
        if self.reviewer.trim().is_empty() {
            return Err(PointsError::validation("reviewer", "must not be empty"));
        }
        Ok(())
    }
}
