//! Work log submission and review.
//!
//! A work log starts out pending. Approval awards points for the logged
//! hours (or a reviewer override) and notifies the employee; rejection needs
//! a comment and also notifies. Reviewed logs are final.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use super::PointsStore;
use crate::error::{PointsError, PointsResult};
use crate::models::{
    NewNotification, NewWorkLog, NotificationKind, PointsEntry, PointsSource, Review, WorkLog,
    WorkLogStatus,
};

impl PointsStore {
    /// Submits a pending work log for an existing employee.
    pub fn submit_work_log(&self, new: NewWorkLog) -> PointsResult<WorkLog> {
        new.validate(&self.config)?;
        let mut tables = self.write()?;
        tables.employee(new.employee_id)?;

        let work_log = WorkLog {
            id: Uuid::new_v4(),
            employee_id: new.employee_id,
            work_date: new.work_date,
            title: new.title.trim().to_string(),
            description: new.description,
            hours: new.hours,
            metrics: new.metrics,
            status: WorkLogStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            review_comment: None,
            points_awarded: None,
        };
        tables.work_logs.insert(work_log.id, work_log.clone());

        tracing::info!(
            work_log_id = %work_log.id,
            employee_id = %work_log.employee_id,
            hours = %work_log.hours,
            "Work log submitted"
        );
        Ok(work_log)
    }

    /// Looks up a work log.
    pub fn work_log(&self, id: Uuid) -> PointsResult<WorkLog> {
        self.read()?.work_log(id).cloned()
    }

    /// Lists work logs by work date, optionally filtered by employee and
    /// status.
    pub fn list_work_logs(
        &self,
        employee_id: Option<Uuid>,
        status: Option<WorkLogStatus>,
    ) -> PointsResult<Vec<WorkLog>> {
        let tables = self.read()?;
        let mut logs: Vec<WorkLog> = tables
            .work_logs
            .values()
            .filter(|w| employee_id.is_none_or(|e| w.employee_id == e))
            .filter(|w| status.is_none_or(|s| w.status == s))
            .cloned()
            .collect();
        logs.sort_by(|a, b| {
            (a.work_date, a.submitted_at, a.id).cmp(&(b.work_date, b.submitted_at, b.id))
        });
        Ok(logs)
    }

    /// Approves a pending work log.
    ///
    /// The employee is awarded `review.points` if given, otherwise
    /// `hours × work_log_points_per_hour` rounded to 2 decimal places. No
    /// points entry is written when the award is zero. The employee is
    /// notified either way.
    ///
    /// # Errors
    ///
    /// - `Validation` for a missing reviewer, a negative override, or points
    ///   that would take the balance out of the decimal range
    /// - `NotFound` if the work log doesn't exist
    /// - `InvalidTransition` if the log was already reviewed
    pub fn approve_work_log(&self, id: Uuid, review: Review) -> PointsResult<WorkLog> {
        review.validate()?;
        if review.points.is_some_and(|p| p < Decimal::ZERO) {
            return Err(PointsError::validation("points", "must not be negative"));
        }

        let mut tables = self.write()?;
        let work_log = tables.work_log(id)?;
        ensure_pending(work_log, "approved")?;

        let points = match review.points {
            Some(points) => points,
            None => (work_log.hours * self.config.policy().work_log_points_per_hour)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        };

        // The points entry goes first so a refused entry leaves the log pending.
        let now = Utc::now();
        if !points.is_zero() {
            let reason = format!("Approved work log: {}", work_log.title);
            let employee_id = work_log.employee_id;
            tables.insert_points(PointsEntry {
                id: Uuid::new_v4(),
                employee_id,
                points,
                reason,
                source: PointsSource::WorkLog { work_log_id: id },
                awarded_by: review.reviewer.clone(),
                awarded_at: now,
            })?;
        }

        let work_log = tables
            .work_logs
            .get_mut(&id)
            .ok_or_else(|| PointsError::not_found("Work log", id))?;
        work_log.status = WorkLogStatus::Approved;
        work_log.reviewed_at = Some(now);
        work_log.reviewed_by = Some(review.reviewer);
        work_log.review_comment = review.comment;
        work_log.points_awarded = Some(points);
        let approved = work_log.clone();

        tables.insert_notification(NewNotification {
            recipient_id: approved.employee_id,
            kind: NotificationKind::WorkLogApproved,
            title: "Work log approved".to_string(),
            message: format!(
                "'{}' on {} was approved for {} points",
                approved.title,
                approved.work_date,
                points.normalize()
            ),
        });

        tracing::info!(
            work_log_id = %approved.id,
            employee_id = %approved.employee_id,
            points = %points,
            "Work log approved"
        );
        Ok(approved)
    }

    /// Rejects a pending work log. A comment explaining the rejection is
    /// required; no points are awarded.
    pub fn reject_work_log(&self, id: Uuid, review: Review) -> PointsResult<WorkLog> {
        review.validate()?;
        let comment = match review.comment.as_deref().map(str::trim) {
            Some(comment) if !comment.is_empty() => comment.to_string(),
            _ => {
                return Err(PointsError::validation(
                    "comment",
                    "a rejection needs a comment",
                ));
            }
        };
        if review.points.is_some() {
            return Err(PointsError::validation(
                "points",
                "a rejected work log earns no points",
            ));
        }

        let mut tables = self.write()?;
        ensure_pending(tables.work_log(id)?, "rejected")?;

        let work_log = tables
            .work_logs
            .get_mut(&id)
            .ok_or_else(|| PointsError::not_found("Work log", id))?;
        work_log.status = WorkLogStatus::Rejected;
        work_log.reviewed_at = Some(Utc::now());
        work_log.reviewed_by = Some(review.reviewer);
        work_log.review_comment = Some(comment.clone());
        let rejected = work_log.clone();

        tables.insert_notification(NewNotification {
            recipient_id: rejected.employee_id,
            kind: NotificationKind::WorkLogRejected,
            title: "Work log rejected".to_string(),
            message: format!(
                "'{}' on {} was rejected: {}",
                rejected.title, rejected.work_date, comment
            ),
        });

        tracing::info!(
            work_log_id = %rejected.id,
            employee_id = %rejected.employee_id,
            "Work log rejected"
        );
        Ok(rejected)
    }

    /// Deletes a pending work log and its attachments.
    pub fn delete_work_log(&self, id: Uuid) -> PointsResult<()> {
        let mut tables = self.write()?;
        ensure_pending(tables.work_log(id)?, "deleted")?;

        tables.attachments.retain(|_, a| a.work_log_id != id);
        tables.work_logs.remove(&id);

        tracing::info!(work_log_id = %id, "Work log deleted");
        Ok(())
    }
}

fn ensure_pending(work_log: &WorkLog, action: &'static str) -> PointsResult<()> {
    if !work_log.is_pending() {
        return Err(PointsError::InvalidTransition {
            work_log_id: work_log.id.to_string(),
            status: work_log.status.to_string(),
            action,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::models::{Employee, NewAttachment, NewPointsEntry};
    use std::collections::BTreeMap;

    fn setup() -> (PointsStore, Employee) {
        let store = store();
        let dept = department(&store, "Operations");
        let emp = employee(&store, "E001", dept.id);
        (store, emp)
    }

    fn reviewer() -> Review {
        Review {
            reviewer: "manager".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_creates_pending_log() {
        let (store, emp) = setup();
        let mut new = new_work_log(emp.id, date(2025, 7, 1), "7.5");
        new.metrics = BTreeMap::from([("productivity".to_string(), dec("12"))]);

        let log = store.submit_work_log(new).unwrap();
        assert_eq!(log.status, WorkLogStatus::Pending);
        assert!(log.reviewed_at.is_none());
        assert_eq!(store.work_log(log.id).unwrap(), log);
    }

    #[test]
    fn test_submit_for_unknown_employee_rejected() {
        let (store, _) = setup();
        let result = store.submit_work_log(new_work_log(Uuid::new_v4(), date(2025, 7, 1), "8"));
        assert!(matches!(
            result,
            Err(PointsError::NotFound { entity: "Employee", .. })
        ));
    }

    #[test]
    fn test_submit_validates_hours_and_metrics() {
        let (store, emp) = setup();

        let zero = store.submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "0"));
        assert!(matches!(zero, Err(PointsError::Validation { .. })));

        let too_long = store.submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "24.5"));
        assert!(matches!(too_long, Err(PointsError::Validation { .. })));

        let mut unknown = new_work_log(emp.id, date(2025, 7, 1), "8");
        unknown.metrics.insert("charisma".to_string(), dec("1"));
        assert!(matches!(
            store.submit_work_log(unknown),
            Err(PointsError::MetricNotFound { .. })
        ));

        let mut negative = new_work_log(emp.id, date(2025, 7, 1), "8");
        negative.metrics.insert("quality".to_string(), dec("-1"));
        assert!(matches!(
            store.submit_work_log(negative),
            Err(PointsError::InvalidMetricValue { .. })
        ));
    }

    #[test]
    fn test_approve_awards_hourly_points_and_notifies() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "7.5"))
            .unwrap();

        let approved = store.approve_work_log(log.id, reviewer()).unwrap();
        assert_eq!(approved.status, WorkLogStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("manager"));
        // 7.5 hours x 0.5 points per hour
        assert_eq!(approved.points_awarded, Some(dec("3.75")));

        let entries = store.points_for_employee(emp.id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].points, dec("3.75"));
        assert_eq!(
            entries[0].source,
            PointsSource::WorkLog {
                work_log_id: log.id
            }
        );
        assert_eq!(store.points_balance(emp.id).unwrap(), dec("3.75"));

        let notifications = store.notifications_for(emp.id, false).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::WorkLogApproved);
    }

    #[test]
    fn test_approve_with_override() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();

        let review = Review {
            points: Some(dec("12")),
            comment: Some("Great release support".to_string()),
            ..reviewer()
        };
        let approved = store.approve_work_log(log.id, review).unwrap();
        assert_eq!(approved.points_awarded, Some(dec("12")));
        assert_eq!(approved.review_comment.as_deref(), Some("Great release support"));
        assert_eq!(store.points_balance(emp.id).unwrap(), dec("12"));
    }

    #[test]
    fn test_approval_past_balance_range_leaves_log_pending() {
        let (store, emp) = setup();
        store
            .award_points(
                emp.id,
                NewPointsEntry {
                    points: Decimal::MAX,
                    reason: "Spot award".to_string(),
                    awarded_by: "manager".to_string(),
                },
            )
            .unwrap();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();

        assert!(matches!(
            store.approve_work_log(log.id, reviewer()),
            Err(PointsError::Validation { .. })
        ));
        assert!(store.work_log(log.id).unwrap().is_pending());
        assert_eq!(store.points_balance(emp.id).unwrap(), Decimal::MAX);
    }

    #[test]
    fn test_approve_with_zero_override_writes_no_entry() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();

        let review = Review {
            points: Some(Decimal::ZERO),
            ..reviewer()
        };
        store.approve_work_log(log.id, review).unwrap();
        assert!(store.points_for_employee(emp.id).unwrap().is_empty());
        assert_eq!(store.notifications_for(emp.id, false).unwrap().len(), 1);
    }

    #[test]
    fn test_approve_negative_override_rejected() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();
        let review = Review {
            points: Some(dec("-1")),
            ..reviewer()
        };
        assert!(matches!(
            store.approve_work_log(log.id, review),
            Err(PointsError::Validation { .. })
        ));
        assert!(store.work_log(log.id).unwrap().is_pending());
    }

    #[test]
    fn test_review_twice_is_invalid_transition() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();
        store.approve_work_log(log.id, reviewer()).unwrap();

        match store.approve_work_log(log.id, reviewer()) {
            Err(PointsError::InvalidTransition { status, action, .. }) => {
                assert_eq!(status, "approved");
                assert_eq!(action, "approved");
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }

        let rejection = Review {
            comment: Some("Duplicate".to_string()),
            ..reviewer()
        };
        assert!(matches!(
            store.reject_work_log(log.id, rejection),
            Err(PointsError::InvalidTransition { .. })
        ));
        assert_eq!(store.points_for_employee(emp.id).unwrap().len(), 1);
    }

    #[test]
    fn test_reject_requires_comment() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();

        let blank = Review {
            comment: Some("  ".to_string()),
            ..reviewer()
        };
        assert!(matches!(
            store.reject_work_log(log.id, blank),
            Err(PointsError::Validation { .. })
        ));

        let review = Review {
            comment: Some("Hours not supported by timesheet".to_string()),
            ..reviewer()
        };
        let rejected = store.reject_work_log(log.id, review).unwrap();
        assert_eq!(rejected.status, WorkLogStatus::Rejected);
        assert!(rejected.points_awarded.is_none());
        assert!(store.points_for_employee(emp.id).unwrap().is_empty());

        let notifications = store.notifications_for(emp.id, true).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::WorkLogRejected);
        assert!(notifications[0].message.contains("timesheet"));
    }

    #[test]
    fn test_list_filters_by_employee_and_status() {
        let (store, emp) = setup();
        let dept = store.employee(emp.id).unwrap().department_id;
        let other = employee(&store, "E002", dept);

        let first = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 2), "2"))
            .unwrap();
        store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "3"))
            .unwrap();
        store
            .submit_work_log(new_work_log(other.id, date(2025, 7, 1), "4"))
            .unwrap();
        store.approve_work_log(first.id, reviewer()).unwrap();

        let mine = store.list_work_logs(Some(emp.id), None).unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].work_date, date(2025, 7, 1));

        let pending = store
            .list_work_logs(None, Some(WorkLogStatus::Pending))
            .unwrap();
        assert_eq!(pending.len(), 2);

        let approved = store
            .list_work_logs(Some(emp.id), Some(WorkLogStatus::Approved))
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, first.id);
    }

    #[test]
    fn test_delete_pending_log_removes_attachments() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();
        let attachment = store
            .add_attachment(
                log.id,
                NewAttachment {
                    file_name: "evidence.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    size_bytes: 100,
                    uploaded_by: "E001".to_string(),
                },
            )
            .unwrap();

        store.delete_work_log(log.id).unwrap();
        assert!(store.work_log(log.id).is_err());
        assert!(matches!(
            store.delete_attachment(attachment.id),
            Err(PointsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_reviewed_log_rejected() {
        let (store, emp) = setup();
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "2"))
            .unwrap();
        store.approve_work_log(log.id, reviewer()).unwrap();

        assert!(matches!(
            store.delete_work_log(log.id),
            Err(PointsError::InvalidTransition { action: "deleted", .. })
        ));
    }
}
