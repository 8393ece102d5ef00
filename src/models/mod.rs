//! Core data models for the points engine.
//!
//! This module contains the scoring inputs and outputs and the records kept
//! by the store.

mod attachment;
mod department;
mod employee;
mod grade;
mod grade_report;
mod notification;
mod points;
mod scorecard;
mod target;
mod work_log;

pub use attachment::{FileAttachment, NewAttachment};
pub use department::{Department, DepartmentUpdate, NewDepartment};
pub use employee::{Employee, EmployeeUpdate, NewEmployee};
pub use grade::{Grade, GradeCounts};
pub use grade_report::{
    AdjustmentSource, AppliedAdjustment, AuditStep, AuditTrace, AuditWarning, GradeReport,
    GradeSummary, MetricGrade,
};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use points::{LeaderboardEntry, NewPointsEntry, PointsEntry, PointsSource};
pub use scorecard::{ReviewPeriod, Scorecard};
pub use target::{NewTarget, TargetScope, TargetSetting};
pub use work_log::{NewWorkLog, Review, WorkLog, WorkLogStatus};
