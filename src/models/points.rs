//! Points ledger records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Grade;
use crate::error::{PointsError, PointsResult};

/// What caused a points entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointsSource {
    /// Credited when a work log was approved.
    WorkLog {
        /// The approved work log.
        work_log_id: Uuid,
    },
    /// Credited for a period grade.
    Grade {
        /// The grade report the points came from.
        report_id: Uuid,
        /// The overall grade.
        grade: Grade,
    },
    /// Entered by hand.
    Manual,
}

/// A record of performance credit awarded to an employee.
///
/// Points are signed so deductions can be recorded alongside credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee credited.
    pub employee_id: Uuid,
    /// Signed amount.
    pub points: Decimal,
    /// Why the points were awarded.
    pub reason: String,
    /// What caused the entry.
    pub source: PointsSource,
    /// Who awarded the points.
    pub awarded_by: String,
    /// When the entry was recorded.
    pub awarded_at: DateTime<Utc>,
}

/// Input for a manual points entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPointsEntry {
    /// Signed amount; must not be zero.
    pub points: Decimal,
    /// Why the points are awarded.
    pub reason: String,
    /// Who awards them.
    pub awarded_by: String,
}

impl NewPointsEntry {
    /// Checks the required fields.
    pub fn validate(&self) -> PointsResult<()> {
        if self.points.is_zero() {
            return Err(PointsError::validation("points", "must not be zero"));
        }
        if self.reason.trim().is_empty() {
            return Err(PointsError::validation("reason", "must not be empty"));
        }
        if self.awarded_by.trim().is_empty() {
            return Err(PointsError::validation("awarded_by", "must not be empty"));
        }
        Ok(())
    }
}

/// One row of the points leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: u32,
    /// The employee.
    pub employee_id: Uuid,
    /// The employee's HR number.
    pub employee_number: String,
    /// The employee's name.
    pub full_name: String,
    /// The employee's department.
    pub department_id: Uuid,
    /// Sum of all the employee's points entries.
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_points_rejected() {
        let input = NewPointsEntry {
            points: Decimal::ZERO,
            reason: "Spot award".to_string(),
            awarded_by: "manager".to_string(),
        };
        match input.validate() {
            Err(PointsError::Validation { field, .. }) => assert_eq!(field, "points"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_points_allowed() {
        let input = NewPointsEntry {
            points: Decimal::from(-3),
            reason: "Missed deadline".to_string(),
            awarded_by: "manager".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_source_serialization_is_tagged() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(PointsSource::WorkLog { work_log_id: id }).unwrap();
        assert_eq!(json["type"], "work_log");
        assert_eq!(json["work_log_id"], id.to_string());

        let json = serde_json::to_value(PointsSource::Manual).unwrap();
        assert_eq!(json["type"], "manual");
    }
}
