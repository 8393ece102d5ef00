//! In-process record store.
//!
//! [`PointsStore`] keeps every record behind a single `RwLock`, so each
//! operation that touches several tables (approving a work log, awarding a
//! grade, cascading a delete) happens atomically. Operations are grouped by
//! record kind in the submodules.
//!
//! # Example
//!
//! ```no_run
//! use points_engine::config::ConfigLoader;
//! use points_engine::models::NewDepartment;
//! use points_engine::store::PointsStore;
//!
//! let loader = ConfigLoader::load("./config/scoring")?;
//! let store = PointsStore::new(loader.shared());
//! let department = store.create_department(NewDepartment {
//!     name: "Operations".to_string(),
//!     description: String::new(),
//! })?;
//! println!("Created {}", department.id);
//! # Ok::<(), points_engine::error::PointsError>(())
//! ```

mod attachments;
mod departments;
mod employees;
mod grading;
mod notifications;
mod points;
mod targets;
mod work_logs;

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::error::{PointsError, PointsResult};
use crate::models::{
    Department, Employee, FileAttachment, NewNotification, Notification, PointsEntry,
    TargetSetting, WorkLog,
};

pub use grading::{GRADE_AWARDED_BY, GradeOutcome};

/// Thread-safe store for departments, employees and their performance records.
#[derive(Debug)]
pub struct PointsStore {
    config: Arc<ScoringConfig>,
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    departments: HashMap<Uuid, Department>,
    employees: HashMap<Uuid, Employee>,
    work_logs: HashMap<Uuid, WorkLog>,
    points: HashMap<Uuid, PointsEntry>,
    notifications: HashMap<Uuid, Notification>,
    attachments: HashMap<Uuid, FileAttachment>,
    targets: HashMap<Uuid, TargetSetting>,
}

impl PointsStore {
    /// Creates an empty store that validates records against `config`.
    pub fn new(config: Arc<ScoringConfig>) -> Self {
        Self {
            config,
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Returns the scoring model the store validates against.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn read(&self) -> PointsResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| PointsError::StoreUnavailable)
    }

    fn write(&self) -> PointsResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| PointsError::StoreUnavailable)
    }
}

impl Tables {
    fn department(&self, id: Uuid) -> PointsResult<&Department> {
        self.departments
            .get(&id)
            .ok_or_else(|| PointsError::not_found("Department", id))
    }

    fn employee(&self, id: Uuid) -> PointsResult<&Employee> {
        self.employees
            .get(&id)
            .ok_or_else(|| PointsError::not_found("Employee", id))
    }

    fn work_log(&self, id: Uuid) -> PointsResult<&WorkLog> {
        self.work_logs
            .get(&id)
            .ok_or_else(|| PointsError::not_found("Work log", id))
    }

    fn insert_notification(&mut self, new: NewNotification) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id: new.recipient_id,
            kind: new.kind,
            title: new.title,
            message: new.message,
            created_at: Utc::now(),
            read_at: None,
        };
        self.notifications
            .insert(notification.id, notification.clone());
        notification
    }

    /// Sums an employee's points entries.
    fn balance_of(&self, employee_id: Uuid) -> PointsResult<Decimal> {
        let points = self
            .points
            .values()
            .filter(|p| p.employee_id == employee_id)
            .map(|p| p.points);
        checked_balance(points).ok_or_else(|| PointsError::CalculationError {
            message: format!(
                "points balance of employee {} exceeds the decimal range",
                employee_id
            ),
        })
    }

    /// Records a points entry, refusing one that would take the employee's
    /// balance out of the decimal range.
    fn insert_points(&mut self, entry: PointsEntry) -> PointsResult<PointsEntry> {
        if self
            .balance_of(entry.employee_id)?
            .checked_add(entry.points)
            .is_none()
        {
            return Err(PointsError::validation(
                "points",
                format!(
                    "{} would take the balance out of the decimal range",
                    entry.points.normalize()
                ),
            ));
        }
        self.points.insert(entry.id, entry.clone());
        Ok(entry)
    }
}

/// Sums points without overflowing whenever the total itself is in range.
///
/// Awards and deductions are interleaved so the running total heads back
/// towards zero before it can leave the range, whatever order the entries
/// arrive in.
fn checked_balance(points: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let (mut awards, mut deductions): (Vec<Decimal>, Vec<Decimal>) =
        points.partition(|p| p.is_sign_positive());
    let mut balance = Decimal::ZERO;
    loop {
        let next = if balance.is_sign_positive() {
            deductions.pop().or_else(|| awards.pop())
        } else {
            awards.pop().or_else(|| deductions.pop())
        };
        match next {
            Some(points) => balance = balance.checked_add(points)?,
            None => return Some(balance),
        }
    }
}
