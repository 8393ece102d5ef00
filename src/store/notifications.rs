//! Notification records.

use chrono::Utc;
use uuid::Uuid;

use super::PointsStore;
use crate::error::{PointsError, PointsResult};
use crate::models::{NewNotification, Notification};

impl PointsStore {
    /// Sends a notification to an existing employee.
    pub fn notify(&self, new: NewNotification) -> PointsResult<Notification> {
        new.validate()?;
        let mut tables = self.write()?;
        tables.employee(new.recipient_id)?;
        Ok(tables.insert_notification(new))
    }

    /// Lists an employee's notifications, newest first.
    pub fn notifications_for(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> PointsResult<Vec<Notification>> {
        let tables = self.read()?;
        tables.employee(recipient_id)?;

        let mut notifications: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .filter(|n| !unread_only || !n.is_read())
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(notifications)
    }

    /// Marks a notification read. Reading it again keeps the first read time.
    pub fn mark_notification_read(&self, id: Uuid) -> PointsResult<Notification> {
        let mut tables = self.write()?;
        let notification = tables
            .notifications
            .get_mut(&id)
            .ok_or_else(|| PointsError::not_found("Notification", id))?;
        if notification.read_at.is_none() {
            notification.read_at = Some(Utc::now());
        }
        Ok(notification.clone())
    }

    /// Marks every unread notification of an employee read and returns how
    /// many changed.
    pub fn mark_all_read(&self, recipient_id: Uuid) -> PointsResult<usize> {
        let mut tables = self.write()?;
        tables.employee(recipient_id)?;

        let now = Utc::now();
        let mut marked = 0;
        for notification in tables
            .notifications
            .values_mut()
            .filter(|n| n.recipient_id == recipient_id && n.read_at.is_none())
        {
            notification.read_at = Some(now);
            marked += 1;
        }

        tracing::debug!(employee_id = %recipient_id, marked, "Notifications marked read");
        Ok(marked)
    }
}
