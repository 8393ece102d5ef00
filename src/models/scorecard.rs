//! Scorecard input for the grading model.
//!
//! A [`Scorecard`] carries the raw metric values of one employee for one
//! [`ReviewPeriod`], optionally with per-metric target overrides.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PointsError, PointsResult};

/// An inclusive date range under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPeriod {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl ReviewPeriod {
    /// Creates a period, rejecting an end before the start.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> PointsResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Checks that the end date is not before the start date.
    pub fn validate(&self) -> PointsResult<()> {
        if self.end_date < self.start_date {
            return Err(PointsError::validation(
                "end_date",
                format!(
                    "{} is before start_date {}",
                    self.end_date, self.start_date
                ),
            ));
        }
        Ok(())
    }

    /// Returns true if `date` falls within the period.
    ///
    /// ```
    /// use points_engine::models::ReviewPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = ReviewPeriod::new(
    ///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
    /// ).unwrap();
    /// assert!(period.contains(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()));
    /// assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()));
    /// ```
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Raw metric values for one employee and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// The employee the scorecard belongs to.
    pub employee_id: String,
    /// The period the values cover.
    pub period: ReviewPeriod,
    /// Raw value per metric code.
    pub metrics: BTreeMap<String, Decimal>,
    /// Target overrides per metric code; missing metrics use the model default.
    #[serde(default)]
    pub targets: BTreeMap<String, Decimal>,
}
