//! Points ledger and leaderboard.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::PointsStore;
use crate::error::PointsResult;
use crate::models::{
    Employee, LeaderboardEntry, NewNotification, NewPointsEntry, NotificationKind, PointsEntry,
    PointsSource,
};

impl PointsStore {
    /// Records a manual points award (or deduction, if negative) and
    /// notifies the employee.
    pub fn award_points(&self, employee_id: Uuid, new: NewPointsEntry) -> PointsResult<PointsEntry> {
        new.validate()?;
        let mut tables = self.write()?;
        tables.employee(employee_id)?;

        let entry = tables.insert_points(PointsEntry {
            id: Uuid::new_v4(),
            employee_id,
            points: new.points,
            reason: new.reason.trim().to_string(),
            source: PointsSource::Manual,
            awarded_by: new.awarded_by,
            awarded_at: Utc::now(),
        })?;

        tables.insert_notification(NewNotification {
            recipient_id: employee_id,
            kind: NotificationKind::PointsAwarded,
            title: if entry.points > Decimal::ZERO {
                "Points awarded".to_string()
            } else {
                "Points deducted".to_string()
            },
            message: format!("{:+} points: {}", entry.points.normalize(), entry.reason),
        });

        tracing::info!(
            employee_id = %employee_id,
            points = %entry.points,
            awarded_by = %entry.awarded_by,
            "Points awarded"
        );
        Ok(entry)
    }

    /// Lists an employee's points entries, oldest first.
    pub fn points_for_employee(&self, employee_id: Uuid) -> PointsResult<Vec<PointsEntry>> {
        Ok(self.points_ledger(employee_id)?.1)
    }

    /// Returns an employee's balance together with their entries, oldest
    /// first, read under one lock.
    pub fn points_ledger(&self, employee_id: Uuid) -> PointsResult<(Decimal, Vec<PointsEntry>)> {
        let tables = self.read()?;
        tables.employee(employee_id)?;

        let mut entries: Vec<PointsEntry> = tables
            .points
            .values()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| (a.awarded_at, a.id).cmp(&(b.awarded_at, b.id)));
        Ok((tables.balance_of(employee_id)?, entries))
    }

    /// Returns the sum of an employee's points entries.
    pub fn points_balance(&self, employee_id: Uuid) -> PointsResult<Decimal> {
        let tables = self.read()?;
        tables.employee(employee_id)?;

        tables.balance_of(employee_id)
    }

    /// Ranks active employees by points balance.
    ///
    /// Ties on balance are broken by employee number. Ranks are 1-based and
    /// consecutive. `limit` caps the number of entries returned.
    pub fn leaderboard(
        &self,
        limit: Option<usize>,
        department_id: Option<Uuid>,
    ) -> PointsResult<Vec<LeaderboardEntry>> {
        let tables = self.read()?;

        let mut ranked: Vec<(Decimal, &Employee)> = tables
            .employees
            .values()
            .filter(|e| e.active)
            .filter(|e| department_id.is_none_or(|d| e.department_id == d))
            .map(|e| tables.balance_of(e.id).map(|balance| (balance, e)))
            .collect::<PointsResult<_>>()?;
        ranked.sort_by(|(balance_a, a), (balance_b, b)| {
            balance_b
                .cmp(balance_a)
                .then_with(|| a.employee_number.cmp(&b.employee_number))
        });

        Ok(ranked
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(index, (balance, employee))| LeaderboardEntry {
                rank: index as u32 + 1,
                employee_id: employee.id,
                employee_number: employee.employee_number.clone(),
                full_name: employee.full_name.clone(),
                department_id: employee.department_id,
                balance,
            })
            .collect())
    }
}
