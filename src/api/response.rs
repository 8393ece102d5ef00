//! Response types for the points engine API.
//!
//! This module defines the error response structures, the mapping from
//! [`PointsError`] to HTTP statuses, and the few response bodies that are
//! not plain model records.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PointsError;
use crate::models::PointsEntry;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                // The body text carries serde's description of the problem
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::bad_request(error)
    }
}

impl From<PointsError> for ApiErrorResponse {
    fn from(error: PointsError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            PointsError::ConfigNotFound { .. } | PointsError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            PointsError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            ),
            PointsError::MetricNotFound { code } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "METRIC_NOT_FOUND",
                    message,
                    format!("The metric code '{}' is not part of the scoring model", code),
                ),
            ),
            PointsError::InvalidMetricValue { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_METRIC_VALUE", message),
            ),
            PointsError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the '{}' field", field),
                ),
            ),
            PointsError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            PointsError::DuplicateEmployeeNumber { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_EMPLOYEE_NUMBER", message),
            ),
            PointsError::DuplicateDepartment { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_DEPARTMENT", message),
            ),
            PointsError::ReferentialIntegrity { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("REFERENTIAL_INTEGRITY", message),
            ),
            PointsError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("INVALID_TRANSITION", message),
            ),
            PointsError::CalculationError { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "CALCULATION_ERROR",
                    "Calculation failed",
                    message,
                ),
            ),
            PointsError::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("STORE_UNAVAILABLE", message),
            ),
        };
        Self { status, error }
    }
}

/// Response body for `GET /employees/:id/points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsLedger {
    /// The employee.
    pub employee_id: Uuid,
    /// Sum of all entries.
    pub balance: Decimal,
    /// Entries, oldest first.
    pub entries: Vec<PointsEntry>,
}

/// Response body for marking every notification read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedRead {
    /// How many notifications changed from unread to read.
    pub marked: usize,
}
