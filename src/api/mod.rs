//! HTTP API module for the points engine.
//!
//! This module provides the REST API endpoints for grading scorecards and
//! managing employees, departments and their performance records.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    EmployeeGradeRequest, EmployeeQuery, GradeRequest, LeaderboardQuery, NotificationQuery,
    PeriodRequest, TargetQuery, WorkLogQuery,
};
pub use response::{ApiError, ApiErrorResponse, MarkedRead, PointsLedger};
pub use state::AppState;
