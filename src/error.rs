//! Error types for the points engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the scoring model and the record store can report.

use thiserror::Error;

/// The main error type for the points engine.
///
/// Scoring, configuration loading and store operations all return this
/// error type, so callers (including the HTTP layer) can map it in one place.
///
/// # Example
///
/// ```
/// use points_engine::error::PointsError;
///
/// let error = PointsError::ConfigNotFound {
///     path: "/missing/metrics.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/metrics.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PointsError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is not a usable scoring model.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A metric code is not part of the scoring model.
    #[error("Metric not found: {code}")]
    MetricNotFound {
        /// The metric code that was not found.
        code: String,
    },

    /// A metric value or target was out of range.
    #[error("Invalid value for metric '{metric}': {message}")]
    InvalidMetricValue {
        /// The metric code.
        metric: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A record was not found in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "Employee").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// Another employee already uses this employee number.
    #[error("Employee number already in use: {employee_number}")]
    DuplicateEmployeeNumber {
        /// The conflicting employee number.
        employee_number: String,
    },

    /// Another department already uses this name.
    #[error("Department name already in use: {name}")]
    DuplicateDepartment {
        /// The conflicting department name.
        name: String,
    },

    /// The operation would leave a dangling reference.
    #[error("Referential integrity violation: {message}")]
    ReferentialIntegrity {
        /// A description of the violated reference.
        message: String,
    },

    /// A work log is not in a state that allows the requested change.
    #[error("Work log '{work_log_id}' is {status} and cannot be {action}")]
    InvalidTransition {
        /// The work log identifier.
        work_log_id: String,
        /// The current status of the work log.
        status: String,
        /// The attempted action (e.g. "approved").
        action: &'static str,
    },

    /// A field of an incoming record failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// The record store lock was poisoned by a panicking writer.
    #[error("Record store unavailable")]
    StoreUnavailable,
}

impl PointsError {
    /// Shorthand for a [`PointsError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`PointsError::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return PointsError.
pub type PointsResult<T> = Result<T, PointsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PointsError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_metric_not_found_displays_code() {
        let error = PointsError::MetricNotFound {
            code: "charisma".to_string(),
        };
        assert_eq!(error.to_string(), "Metric not found: charisma");
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PointsError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = PointsError::not_found("Employee", "emp-42");
        assert_eq!(error.to_string(), "Employee not found: emp-42");
    }

    #[test]
    fn test_invalid_transition_displays_status_and_action() {
        let error = PointsError::InvalidTransition {
            work_log_id: "wl-1".to_string(),
            status: "approved".to_string(),
            action: "rejected",
        };
        assert_eq!(
            error.to_string(),
            "Work log 'wl-1' is approved and cannot be rejected"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = PointsError::validation("hours", "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Invalid field 'hours': must be greater than zero"
        );
    }

    #[test]
    fn test_duplicate_employee_number_displays_number() {
        let error = PointsError::DuplicateEmployeeNumber {
            employee_number: "E-1001".to_string(),
        };
        assert_eq!(error.to_string(), "Employee number already in use: E-1001");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PointsError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_store_unavailable() -> PointsResult<()> {
            Err(PointsError::StoreUnavailable)
        }

        fn propagates_error() -> PointsResult<()> {
            returns_store_unavailable()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
