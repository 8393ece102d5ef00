//! Request types for the points engine API.
//!
//! Record-creation bodies reuse the `New*` model types directly; this module
//! holds the bodies and query strings that have no model counterpart.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::PointsResult;
use crate::models::{ReviewPeriod, Scorecard, WorkLogStatus};

/// Request body for the `/grade` endpoint.
///
/// Grades raw metric values without touching the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    /// Free-form identifier echoed back in the report.
    pub employee_id: String,
    /// The review period the values cover.
    pub period: PeriodRequest,
    /// Raw value per metric code.
    pub metrics: BTreeMap<String, Decimal>,
    /// Optional target overrides per metric code.
    #[serde(default)]
    pub targets: BTreeMap<String, Decimal>,
}

/// A review period in a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PeriodRequest {
    /// Converts to a validated [`ReviewPeriod`].
    pub fn into_period(self) -> PointsResult<ReviewPeriod> {
        ReviewPeriod::new(self.start_date, self.end_date)
    }
}

impl GradeRequest {
    /// Converts to a [`Scorecard`], validating the period.
    pub fn into_scorecard(self) -> PointsResult<Scorecard> {
        Ok(Scorecard {
            employee_id: self.employee_id,
            period: self.period.into_period()?,
            metrics: self.metrics,
            targets: self.targets,
        })
    }
}

/// Request body for `POST /employees/:id/grade`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeGradeRequest {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Record the grade's points and notify the employee.
    #[serde(default)]
    pub award: bool,
}

/// Query string for `GET /employees`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Only employees in this department.
    pub department_id: Option<Uuid>,
    /// Only active (or only inactive) employees.
    pub active: Option<bool>,
    /// Look up a single employee by number.
    pub employee_number: Option<String>,
}

/// Query string for `GET /work-logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkLogQuery {
    /// Only this employee's work logs.
    pub employee_id: Option<Uuid>,
    /// Only work logs in this status.
    pub status: Option<WorkLogStatus>,
}

/// Query string for `GET /employees/:id/notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    /// Skip notifications that were already read.
    #[serde(default)]
    pub unread_only: bool,
}

/// Query string for `GET /targets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetQuery {
    /// Only targets for this metric.
    pub metric_code: Option<String>,
}

/// Query string for `GET /leaderboard`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    /// Maximum number of entries.
    pub limit: Option<usize>,
    /// Only employees in this department.
    pub department_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PointsError;

    #[test]
    fn test_grade_request_deserialization() {
        let json = r#"{
            "employee_id": "emp_001",
            "period": { "start_date": "2025-07-01", "end_date": "2025-09-30" },
            "metrics": { "quality": "97.5", "teamwork": 88 }
        }"#;

        let request: GradeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.metrics.len(), 2);
        assert!(request.targets.is_empty());

        let scorecard = request.into_scorecard().unwrap();
        assert_eq!(scorecard.metrics["quality"], Decimal::new(975, 1));
        assert_eq!(scorecard.metrics["teamwork"], Decimal::from(88));
    }

    #[test]
    fn test_inverted_period_rejected() {
        let period = PeriodRequest {
            start_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        };
        assert!(matches!(
            period.into_period(),
            Err(PointsError::Validation { .. })
        ));
    }

    #[test]
    fn test_employee_grade_request_defaults_to_no_award() {
        let json = r#"{"start_date": "2025-07-01", "end_date": "2025-09-30"}"#;
        let request: EmployeeGradeRequest = serde_json::from_str(json).unwrap();
        assert!(!request.award);
    }

    #[test]
    fn test_missing_metrics_field_is_error() {
        let json = r#"{
            "employee_id": "emp_001",
            "period": { "start_date": "2025-07-01", "end_date": "2025-09-30" }
        }"#;
        let result: Result<GradeRequest, _> = serde_json::from_str(json);
        assert!(result.unwrap_err().to_string().contains("missing field"));
    }
}
