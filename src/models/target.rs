//! Per-employee and per-department metric targets.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::error::{PointsError, PointsResult};

/// Who a target setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TargetScope {
    /// A single employee.
    Employee(Uuid),
    /// Every employee in a department.
    Department(Uuid),
}

/// A metric target overriding the model default for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSetting {
    /// Unique identifier.
    pub id: Uuid,
    /// Who the target applies to.
    pub scope: TargetScope,
    /// The metric being targeted.
    pub metric_code: String,
    /// The raw value that scores exactly 100.
    pub target: Decimal,
    /// First day the target applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last day the target applies (inclusive); open-ended when `None`.
    pub effective_to: Option<NaiveDate>,
    /// When the setting was created.
    pub created_at: DateTime<Utc>,
}

impl TargetSetting {
    /// Returns true if the target applies on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|to| date <= to)
    }
}

/// Input for creating a target setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTarget {
    /// Who the target applies to.
    pub scope: TargetScope,
    /// The metric being targeted.
    pub metric_code: String,
    /// The target value.
    pub target: Decimal,
    /// First day the target applies.
    pub effective_from: NaiveDate,
    /// Last day the target applies.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl NewTarget {
    /// Checks the setting against the scoring model.
    pub fn validate(&self, config: &ScoringConfig) -> PointsResult<()> {
        config.metric(&self.metric_code)?;
        if self.target <= Decimal::ZERO {
            return Err(PointsError::InvalidMetricValue {
                metric: self.metric_code.clone(),
                message: "target must be greater than zero".to_string(),
            });
        }
        if let Some(to) = self.effective_to {
            if to < self.effective_from {
                return Err(PointsError::validation(
                    "effective_to",
                    format!("{} is before effective_from {}", to, self.effective_from),
                ));
            }
        }
        Ok(())
    }
}
