//! Employee model and related types.
//!
//! This module defines the Employee record and the inputs used to create
//! and update it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{PointsError, PointsResult};

/// Represents an employee earning performance points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The HR employee number; unique across all employees.
    pub employee_number: String,
    /// Full display name.
    pub full_name: String,
    /// Contact email, if known.
    pub email: Option<String>,
    /// The department the employee belongs to.
    pub department_id: Uuid,
    /// Job title.
    pub position: String,
    /// The date the employee started employment.
    pub hire_date: NaiveDate,
    /// Inactive employees are kept for history but left off leaderboards.
    pub active: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    /// The HR employee number.
    pub employee_number: String,
    /// Full display name.
    pub full_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// The department the employee belongs to.
    pub department_id: Uuid,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// The date the employee started employment.
    pub hire_date: NaiveDate,
    /// Whether the employee is active; defaults to true.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewEmployee {
    /// Checks the required fields.
    ///
    /// ```
    /// use points_engine::models::NewEmployee;
    /// use chrono::NaiveDate;
    /// use uuid::Uuid;
    ///
    /// let input = NewEmployee {
    ///     employee_number: "".to_string(),
    ///     full_name: "Ada Lovelace".to_string(),
    ///     email: None,
    ///     department_id: Uuid::new_v4(),
    ///     position: String::new(),
    ///     hire_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
    ///     active: true,
    /// };
    /// assert!(input.validate().is_err());
    /// ```
    pub fn validate(&self) -> PointsResult<()> {
        validate_employee_number(&self.employee_number)?;
        validate_full_name(&self.full_name)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Partial update for an employee; `None` leaves a field unchanged.
///
/// `email` distinguishes an absent field from an explicit `null`, which
/// clears the stored email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    /// New employee number.
    #[serde(default)]
    pub employee_number: Option<String>,
    /// New display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// New email; `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    /// New department.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// New job title.
    #[serde(default)]
    pub position: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub active: Option<bool>,
}

impl EmployeeUpdate {
    /// Checks any fields being changed.
    pub fn validate(&self) -> PointsResult<()> {
        if let Some(number) = &self.employee_number {
            validate_employee_number(number)?;
        }
        if let Some(name) = &self.full_name {
            validate_full_name(name)?;
        }
        if let Some(Some(email)) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Marks a field as present, so `null` arrives as `Some(None)`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_employee_number(number: &str) -> PointsResult<()> {
    if number.trim().is_empty() {
        return Err(PointsError::validation("employee_number", "must not be empty"));
    }
    if number.chars().any(char::is_whitespace) {
        return Err(PointsError::validation(
            "employee_number",
            "must not contain whitespace",
        ));
    }
    Ok(())
}

fn validate_full_name(name: &str) -> PointsResult<()> {
    if name.trim().is_empty() {
        return Err(PointsError::validation("full_name", "must not be empty"));
    }
    Ok(())
}

fn validate_email(email: &str) -> PointsResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(PointsError::validation(
            "email",
            format!("'{}' is not an email address", email),
        )),
    }
}
