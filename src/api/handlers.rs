//! HTTP request handlers for the points engine API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints. Every handler tags its log lines with a fresh correlation id.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PointsError, PointsResult};
use crate::models::{
    DepartmentUpdate, EmployeeUpdate, NewAttachment, NewDepartment, NewEmployee, NewPointsEntry,
    NewTarget, NewWorkLog, Review, ReviewPeriod,
};
use crate::scoring::grade_scorecard;

use super::request::{
    EmployeeGradeRequest, EmployeeQuery, GradeRequest, LeaderboardQuery, NotificationQuery,
    TargetQuery, WorkLogQuery,
};
use super::response::{ApiErrorResponse, MarkedRead, PointsLedger};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/grade", post(grade_handler))
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/:id",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/:id/grade", post(grade_employee))
        .route(
            "/employees/:id/points",
            get(employee_points).post(award_points),
        )
        .route("/employees/:id/notifications", get(employee_notifications))
        .route(
            "/employees/:id/notifications/read",
            post(mark_all_notifications_read),
        )
        .route("/work-logs", get(list_work_logs).post(submit_work_log))
        .route("/work-logs/:id", get(get_work_log).delete(delete_work_log))
        .route("/work-logs/:id/approve", post(approve_work_log))
        .route("/work-logs/:id/reject", post(reject_work_log))
        .route(
            "/work-logs/:id/attachments",
            get(list_attachments).post(add_attachment),
        )
        .route("/attachments/:id", delete(delete_attachment))
        .route("/notifications/:id/read", post(mark_notification_read))
        .route("/targets", get(list_targets).post(create_target))
        .route("/targets/:id", delete(delete_target))
        .route("/leaderboard", get(leaderboard))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rejected request body"
            );
            Err(rejection.into())
        }
    }
}

/// Renders a store result, logging the outcome.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: PointsResult<T>,
) -> HandlerResult {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok((status, Json(body)).into_response())
        }
        Err(err) => Err(failed(correlation_id, operation, err)),
    }
}

/// Renders a result with no body as 204 No Content.
fn respond_empty(
    correlation_id: Uuid,
    operation: &'static str,
    result: PointsResult<()>,
) -> HandlerResult {
    match result {
        Ok(()) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Err(err) => Err(failed(correlation_id, operation, err)),
    }
}

fn failed(correlation_id: Uuid, operation: &'static str, err: PointsError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    err.into()
}

/// Handler for POST /grade.
///
/// Grades a scorecard against the loaded model without touching the store.
async fn grade_handler(
    State(state): State<AppState>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing grade request");

    let request = parse_body(payload, correlation_id)?;
    let start_time = Instant::now();
    let result = request
        .into_scorecard()
        .and_then(|scorecard| grade_scorecard(&scorecard, state.config().config()));

    match result {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %report.employee_id,
                metrics_count = report.metric_grades.len(),
                overall_score = %report.summary.overall_score,
                grade = %report.summary.overall_grade,
                duration_us = start_time.elapsed().as_micros(),
                "Grading completed successfully"
            );
            Ok((StatusCode::OK, Json(report)).into_response())
        }
        Err(err) => Err(failed(correlation_id, "grade", err)),
    }
}

async fn list_departments(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "list_departments",
        StatusCode::OK,
        state.store().list_departments(),
    )
}

async fn create_department(
    State(state): State<AppState>,
    payload: Result<Json<NewDepartment>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "create_department",
        StatusCode::CREATED,
        state.store().create_department(new),
    )
}

async fn get_department(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "get_department",
        StatusCode::OK,
        state.store().department(id),
    )
}

async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DepartmentUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let update = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "update_department",
        StatusCode::OK,
        state.store().update_department(id, update),
    )
}

async fn delete_department(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond_empty(
        correlation_id,
        "delete_department",
        state.store().delete_department(id),
    )
}

async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let store = state.store();
    let result = match query.employee_number {
        // The other filters still apply to the single match.
        Some(number) => match store.employee_by_number(&number) {
            Ok(employee) => Ok(Some(employee)
                .filter(|e| query.department_id.is_none_or(|d| e.department_id == d))
                .filter(|e| query.active.is_none_or(|active| e.active == active))
                .into_iter()
                .collect::<Vec<_>>()),
            Err(PointsError::NotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(err),
        },
        None => store.list_employees(query.department_id, query.active),
    };
    respond(correlation_id, "list_employees", StatusCode::OK, result)
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "create_employee",
        StatusCode::CREATED,
        state.store().create_employee(new),
    )
}

async fn get_employee(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "get_employee",
        StatusCode::OK,
        state.store().employee(id),
    )
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let update = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "update_employee",
        StatusCode::OK,
        state.store().update_employee(id, update),
    )
}

async fn delete_employee(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond_empty(
        correlation_id,
        "delete_employee",
        state.store().delete_employee(id),
    )
}

/// Handler for POST /employees/:id/grade.
///
/// Grades the employee from approved work logs, optionally awarding points.
async fn grade_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<EmployeeGradeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, "Processing employee grade request");

    let request = parse_body(payload, correlation_id)?;
    let result = ReviewPeriod::new(request.start_date, request.end_date)
        .and_then(|period| state.store().grade_employee(id, period, request.award));
    respond(correlation_id, "grade_employee", StatusCode::OK, result)
}

async fn employee_points(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let result = state
        .store()
        .points_ledger(id)
        .map(|(balance, entries)| PointsLedger {
            employee_id: id,
            balance,
            entries,
        });
    respond(correlation_id, "employee_points", StatusCode::OK, result)
}

async fn award_points(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<NewPointsEntry>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "award_points",
        StatusCode::CREATED,
        state.store().award_points(id, new),
    )
}

async fn employee_notifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<NotificationQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "employee_notifications",
        StatusCode::OK,
        state.store().notifications_for(id, query.unread_only),
    )
}

async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "mark_all_notifications_read",
        StatusCode::OK,
        state
            .store()
            .mark_all_read(id)
            .map(|marked| MarkedRead { marked }),
    )
}

async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "mark_notification_read",
        StatusCode::OK,
        state.store().mark_notification_read(id),
    )
}

async fn list_work_logs(
    State(state): State<AppState>,
    Query(query): Query<WorkLogQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "list_work_logs",
        StatusCode::OK,
        state.store().list_work_logs(query.employee_id, query.status),
    )
}

async fn submit_work_log(
    State(state): State<AppState>,
    payload: Result<Json<NewWorkLog>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "submit_work_log",
        StatusCode::CREATED,
        state.store().submit_work_log(new),
    )
}

async fn get_work_log(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "get_work_log",
        StatusCode::OK,
        state.store().work_log(id),
    )
}

async fn delete_work_log(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond_empty(
        correlation_id,
        "delete_work_log",
        state.store().delete_work_log(id),
    )
}

async fn approve_work_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Review>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let review = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "approve_work_log",
        StatusCode::OK,
        state.store().approve_work_log(id, review),
    )
}

async fn reject_work_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Review>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let review = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "reject_work_log",
        StatusCode::OK,
        state.store().reject_work_log(id, review),
    )
}

async fn list_attachments(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "list_attachments",
        StatusCode::OK,
        state.store().attachments_for(id),
    )
}

async fn add_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<NewAttachment>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "add_attachment",
        StatusCode::CREATED,
        state.store().add_attachment(id, new),
    )
}

async fn delete_attachment(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond_empty(
        correlation_id,
        "delete_attachment",
        state.store().delete_attachment(id),
    )
}

async fn list_targets(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "list_targets",
        StatusCode::OK,
        state.store().list_targets(query.metric_code.as_deref()),
    )
}

async fn create_target(
    State(state): State<AppState>,
    payload: Result<Json<NewTarget>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "create_target",
        StatusCode::CREATED,
        state.store().create_target(new),
    )
}

async fn delete_target(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond_empty(
        correlation_id,
        "delete_target",
        state.store().delete_target(id),
    )
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "leaderboard",
        StatusCode::OK,
        state.store().leaderboard(query.limit, query.department_id),
    )
}
