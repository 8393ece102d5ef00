//! Grading employees from their approved work logs.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::PointsStore;
use super::targets::resolve_in;
use crate::error::PointsResult;
use crate::models::{
    GradeReport, NewNotification, Notification, NotificationKind, PointsEntry, PointsSource,
    ReviewPeriod, Scorecard, WorkLog, WorkLogStatus,
};
use crate::scoring::{aggregate_metric_values, grade_scorecard};

/// Who grade awards are recorded as coming from.
pub const GRADE_AWARDED_BY: &str = "grading";

/// The result of grading an employee.
#[derive(Debug, Clone, Serialize)]
pub struct GradeOutcome {
    /// The full grade report.
    pub report: GradeReport,
    /// The points entry written for the grade, if one was awarded.
    pub points_entry: Option<PointsEntry>,
    /// The notification sent for the award, if one was sent.
    pub notification: Option<Notification>,
}

impl PointsStore {
    /// Grades an employee over a review period.
    ///
    /// The scorecard is built from the employee's approved work logs dated
    /// inside the period: each metric's per-log values are combined with the
    /// metric's configured aggregation, and targets are resolved as of the
    /// last day of the period. Scoring runs without holding the store lock.
    /// With `award` set and a grade worth points, a points entry and a
    /// notification are written together afterwards.
    ///
    /// # Errors
    ///
    /// - `Validation` if the period ends before it starts, or the award would
    ///   take the balance out of the decimal range
    /// - `NotFound` if the employee doesn't exist
    /// - `CalculationError` if no approved work log in the period reports a
    ///   metric, or summed values leave the decimal range
    pub fn grade_employee(
        &self,
        employee_id: Uuid,
        period: ReviewPeriod,
        award: bool,
    ) -> PointsResult<GradeOutcome> {
        period.validate()?;
        let (scorecard, work_logs) = self.build_scorecard(employee_id, period)?;
        let report = grade_scorecard(&scorecard, &self.config)?;

        tracing::info!(
            employee_id = %employee_id,
            report_id = %report.report_id,
            work_logs,
            overall_score = %report.summary.overall_score,
            grade = %report.summary.overall_grade,
            "Employee graded"
        );

        let points = report.summary.points;
        if !award || points == Decimal::ZERO {
            return Ok(GradeOutcome {
                report,
                points_entry: None,
                notification: None,
            });
        }

        let mut tables = self.write()?;
        tables.employee(employee_id)?;
        let grade = report.summary.overall_grade;
        let entry = tables.insert_points(PointsEntry {
            id: Uuid::new_v4(),
            employee_id,
            points,
            reason: format!(
                "Grade {} for {} to {}",
                grade, period.start_date, period.end_date
            ),
            source: PointsSource::Grade {
                report_id: report.report_id,
                grade,
            },
            awarded_by: GRADE_AWARDED_BY.to_string(),
            awarded_at: Utc::now(),
        })?;
        let notification = tables.insert_notification(NewNotification {
            recipient_id: employee_id,
            kind: NotificationKind::GradeAwarded,
            title: format!("You earned grade {}", grade),
            message: format!(
                "Overall score {} for {} to {} earned {} points",
                report.summary.overall_score.normalize(),
                period.start_date,
                period.end_date,
                points.normalize()
            ),
        });

        tracing::info!(
            employee_id = %employee_id,
            points = %points,
            "Grade points awarded"
        );
        Ok(GradeOutcome {
            report,
            points_entry: Some(entry),
            notification: Some(notification),
        })
    }

    /// Builds the employee's scorecard for `period` under a read lock,
    /// returning it with the number of approved work logs it draws on.
    fn build_scorecard(
        &self,
        employee_id: Uuid,
        period: ReviewPeriod,
    ) -> PointsResult<(Scorecard, usize)> {
        let tables = self.read()?;
        let employee = tables.employee(employee_id)?;

        let mut approved: Vec<&WorkLog> = tables
            .work_logs
            .values()
            .filter(|w| {
                w.employee_id == employee_id
                    && w.status == WorkLogStatus::Approved
                    && period.contains(w.work_date)
            })
            .collect();
        approved.sort_by_key(|w| (w.work_date, w.submitted_at));

        let mut values: BTreeMap<&str, Vec<_>> = BTreeMap::new();
        for work_log in &approved {
            for (code, value) in &work_log.metrics {
                values
                    .entry(code.as_str())
                    .or_default()
                    .push((work_log.work_date, *value));
            }
        }

        let mut metrics = BTreeMap::new();
        let mut targets = BTreeMap::new();
        for (code, metric) in self.config.metrics() {
            let Some(logged) = values.remove(code.as_str()) else {
                continue;
            };
            if let Some(value) = aggregate_metric_values(code, &logged, metric.aggregation)? {
                metrics.insert(code.clone(), value);
            }
            if let Some(target) = resolve_in(&tables, employee, code, period.end_date) {
                targets.insert(code.clone(), target);
            }
        }

        let scorecard = Scorecard {
            employee_id: employee_id.to_string(),
            period,
            metrics,
            targets,
        };
        Ok((scorecard, approved.len()))
    }
}
