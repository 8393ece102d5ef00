//! Department records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PointsError, PointsResult};

/// An organisational unit employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name, unique ignoring case.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl NewDepartment {
    /// Checks the required fields.
    pub fn validate(&self) -> PointsResult<()> {
        validate_name(&self.name)
    }
}

/// Partial update for a department; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

impl DepartmentUpdate {
    /// Checks any fields being changed.
    pub fn validate(&self) -> PointsResult<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> PointsResult<()> {
    if name.trim().is_empty() {
        return Err(PointsError::validation("name", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let input = NewDepartment {
            name: "   ".to_string(),
            description: String::new(),
        };
        assert!(matches!(
            input.validate(),
            Err(PointsError::Validation { .. })
        ));
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(DepartmentUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_without_description() {
        let input: NewDepartment = serde_json::from_str(r#"{"name": "Operations"}"#).unwrap();
        assert_eq!(input.name, "Operations");
        assert!(input.description.is_empty());
    }
}
