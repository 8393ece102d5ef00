//! In-app notifications.
//!
//! Only the records live here; delivering them (email, push) is left to
//! whatever reads the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PointsError, PointsResult};

/// What a notification is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A work log was approved.
    WorkLogApproved,
    /// A work log was rejected.
    WorkLogRejected,
    /// Points were credited or deducted by hand.
    PointsAwarded,
    /// A period grade was recorded.
    GradeAwarded,
    /// Anything else.
    #[default]
    General,
}

/// A message for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee the message is for.
    pub recipient_id: Uuid,
    /// What the message is about.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the recipient read it.
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Returns true once the recipient has read it.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The employee the message is for.
    pub recipient_id: Uuid,
    /// What the message is about.
    #[serde(default)]
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
}

impl NewNotification {
    /// Checks the required fields.
    pub fn validate(&self) -> PointsResult<()> {
        if self.title.trim().is_empty() {
            return Err(PointsError::validation("title", "must not be empty"));
        }
        Ok(())
    }
}
