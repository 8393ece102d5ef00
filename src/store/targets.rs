//! Metric target settings.
//!
//! Targets override the model default for one employee or a whole
//! department over a date range. When several apply, an employee target
//! beats a department target, and among targets of the same scope the one
//! that took effect most recently wins.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{PointsStore, Tables};
use crate::error::{PointsError, PointsResult};
use crate::models::{Employee, NewTarget, TargetScope, TargetSetting};

impl PointsStore {
    /// Creates a target for an existing employee or department.
    pub fn create_target(&self, new: NewTarget) -> PointsResult<TargetSetting> {
        new.validate(&self.config)?;
        let mut tables = self.write()?;
        match new.scope {
            TargetScope::Employee(id) => {
                tables.employee(id)?;
            }
            TargetScope::Department(id) => {
                tables.department(id)?;
            }
        }

        let target = TargetSetting {
            id: Uuid::new_v4(),
            scope: new.scope,
            metric_code: new.metric_code,
            target: new.target,
            effective_from: new.effective_from,
            effective_to: new.effective_to,
            created_at: Utc::now(),
        };
        tables.targets.insert(target.id, target.clone());

        tracing::info!(
            target_id = %target.id,
            metric = %target.metric_code,
            target = %target.target,
            "Target created"
        );
        Ok(target)
    }

    /// Lists targets by metric code and start date, optionally for one
    /// metric only.
    pub fn list_targets(&self, metric_code: Option<&str>) -> PointsResult<Vec<TargetSetting>> {
        let tables = self.read()?;
        let mut targets: Vec<TargetSetting> = tables
            .targets
            .values()
            .filter(|t| metric_code.is_none_or(|m| t.metric_code == m))
            .cloned()
            .collect();
        targets.sort_by(|a, b| {
            (&a.metric_code, a.effective_from, a.id).cmp(&(&b.metric_code, b.effective_from, b.id))
        });
        Ok(targets)
    }

    /// Removes a target.
    pub fn delete_target(&self, id: Uuid) -> PointsResult<()> {
        let mut tables = self.write()?;
        tables
            .targets
            .remove(&id)
            .ok_or_else(|| PointsError::not_found("Target", id))?;
        Ok(())
    }

    /// Returns the target that applies to an employee's metric on `date`,
    /// or `None` when the model default applies.
    pub fn resolve_target(
        &self,
        employee_id: Uuid,
        metric_code: &str,
        date: NaiveDate,
    ) -> PointsResult<Option<Decimal>> {
        self.config.metric(metric_code)?;
        let tables = self.read()?;
        let employee = tables.employee(employee_id)?;
        Ok(resolve_in(&tables, employee, metric_code, date))
    }
}

pub(super) fn resolve_in(
    tables: &Tables,
    employee: &Employee,
    metric_code: &str,
    date: NaiveDate,
) -> Option<Decimal> {
    let latest_for = |scope: TargetScope| {
        tables
            .targets
            .values()
            .filter(|t| t.scope == scope && t.metric_code == metric_code && t.is_active_on(date))
            .max_by_key(|t| (t.effective_from, t.created_at))
            .map(|t| t.target)
    };

    latest_for(TargetScope::Employee(employee.id))
        .or_else(|| latest_for(TargetScope::Department(employee.department_id)))
}
