//! Work log attachment metadata.

use chrono::Utc;
use uuid::Uuid;

use super::PointsStore;
use crate::error::{PointsError, PointsResult};
use crate::models::{FileAttachment, NewAttachment};

impl PointsStore {
    /// Attaches file metadata to an existing work log.
    ///
    /// Size and content type are checked against the model's record policy.
    pub fn add_attachment(&self, work_log_id: Uuid, new: NewAttachment) -> PointsResult<FileAttachment> {
        new.validate(self.config.policy())?;
        let mut tables = self.write()?;
        tables.work_log(work_log_id)?;

        let attachment = FileAttachment {
            id: Uuid::new_v4(),
            work_log_id,
            file_name: new.file_name.trim().to_string(),
            content_type: new.content_type.to_ascii_lowercase(),
            size_bytes: new.size_bytes,
            uploaded_by: new.uploaded_by,
            uploaded_at: Utc::now(),
        };
        tables
            .attachments
            .insert(attachment.id, attachment.clone());

        tracing::info!(
            attachment_id = %attachment.id,
            work_log_id = %work_log_id,
            size_bytes = attachment.size_bytes,
            "Attachment added"
        );
        Ok(attachment)
    }

    /// Lists the attachments of a work log, oldest first.
    pub fn attachments_for(&self, work_log_id: Uuid) -> PointsResult<Vec<FileAttachment>> {
        let tables = self.read()?;
        tables.work_log(work_log_id)?;

        let mut attachments: Vec<FileAttachment> = tables
            .attachments
            .values()
            .filter(|a| a.work_log_id == work_log_id)
            .cloned()
            .collect();
        attachments.sort_by(|a, b| (a.uploaded_at, a.id).cmp(&(b.uploaded_at, b.id)));
        Ok(attachments)
    }

    /// Removes an attachment.
    pub fn delete_attachment(&self, id: Uuid) -> PointsResult<()> {
        let mut tables = self.write()?;
        tables
            .attachments
            .remove(&id)
            .ok_or_else(|| PointsError::not_found("Attachment", id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::models::WorkLog;

    fn setup() -> (PointsStore, WorkLog) {
        let store = store();
        let dept = department(&store, "Operations");
        let emp = employee(&store, "E001", dept.id);
        let log = store
            .submit_work_log(new_work_log(emp.id, date(2025, 7, 1), "8"))
            .unwrap();
        (store, log)
    }

    fn pdf(size_bytes: u64) -> NewAttachment {
        NewAttachment {
            file_name: "timesheet.pdf".to_string(),
            content_type: "Application/PDF".to_string(),
            size_bytes,
            uploaded_by: "E001".to_string(),
        }
    }

    #[test]
    fn test_add_and_list_attachments() {
        let (store, log) = setup();
        let added = store.add_attachment(log.id, pdf(512)).unwrap();
        assert_eq!(added.content_type, "application/pdf");
        assert_eq!(store.attachments_for(log.id).unwrap(), vec![added]);
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let (store, log) = setup();
        // The test policy allows 1024 bytes.
        assert!(store.add_attachment(log.id, pdf(1024)).is_ok());
        assert!(matches!(
            store.add_attachment(log.id, pdf(1025)),
            Err(PointsError::Validation { .. })
        ));
        assert!(matches!(
            store.add_attachment(log.id, pdf(0)),
            Err(PointsError::Validation { .. })
        ));
    }

    #[test]
    fn test_disallowed_content_type_rejected() {
        let (store, log) = setup();
        let mut exe = pdf(10);
        exe.content_type = "application/x-msdownload".to_string();
        assert!(matches!(
            store.add_attachment(log.id, exe),
            Err(PointsError::Validation { .. })
        ));
    }

    #[test]
    fn test_path_in_file_name_rejected() {
        let (store, log) = setup();
        let mut sneaky = pdf(10);
        sneaky.file_name = "../etc/passwd".to_string();
        assert!(matches!(
            store.add_attachment(log.id, sneaky),
            Err(PointsError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_work_log_rejected() {
        let (store, _) = setup();
        assert!(matches!(
            store.add_attachment(Uuid::new_v4(), pdf(10)),
            Err(PointsError::NotFound { entity: "Work log", .. })
        ));
    }

    #[test]
    fn test_delete_attachment() {
        let (store, log) = setup();
        let added = store.add_attachment(log.id, pdf(10)).unwrap();

        store.delete_attachment(added.id).unwrap();
        assert!(store.attachments_for(log.id).unwrap().is_empty());
        assert!(matches!(
            store.delete_attachment(added.id),
            Err(PointsError::NotFound { entity: "Attachment", .. })
        ));
    }
}
