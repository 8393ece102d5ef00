//! File attachment metadata.
//!
//! The store keeps metadata only; file bytes live in external storage keyed
//! by the attachment id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Policy;
use crate::error::{PointsError, PointsResult};

/// A file attached to a work log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Unique identifier.
    pub id: Uuid,
    /// The work log the file belongs to.
    pub work_log_id: Uuid,
    /// Original file name, without directories.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Who uploaded the file.
    pub uploaded_by: String,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// Input for attaching a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttachment {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Who uploaded the file.
    pub uploaded_by: String,
}

impl NewAttachment {
    /// Checks the file against the attachment policy.
    pub fn validate(&self, policy: &Policy) -> PointsResult<()> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(PointsError::validation("file_name", "must not be empty"));
        }
        if name.contains(|c: char| c == '/' || c == '\\') || name == "." || name == ".." {
            return Err(PointsError::validation(
                "file_name",
                "must be a bare file name",
            ));
        }
        if self.size_bytes == 0 {
            return Err(PointsError::validation("size_bytes", "file is empty"));
        }
        if self.size_bytes > policy.attachment_max_bytes {
            return Err(PointsError::validation(
                "size_bytes",
                format!(
                    "{} bytes exceeds the {} byte limit",
                    self.size_bytes, policy.attachment_max_bytes
                ),
            ));
        }
        if !policy
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&self.content_type))
        {
            return Err(PointsError::validation(
                "content_type",
                format!("'{}' is not an accepted file type", self.content_type),
            ));
        }
        Ok(())
    }
}
