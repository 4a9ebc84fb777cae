use axum::extract::State;

use crate::database::models::{
    DateRangeReportRow, Employee, InternalProject, JobRoleReportRow, Training,
};
use crate::filter::{ListParams, Page};
use crate::middleware::{ApiResponse, ApiResult, Json, Path, Query};
use crate::services::{DateRangeParams, InternalProjectRequest, JobRoleReportRequest, TrainingRequest};
use crate::state::AppState;

/// GET /api/manager/employees - optionally filtered by `allocation_type_id`
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Employee>> {
    let query = params.employee_query(&state.config.api)?;
    Ok(ApiResponse::success(state.employees().list(&query).await?))
}

pub async fn get_employee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Employee> {
    Ok(ApiResponse::success(state.employees().get(id).await?))
}

pub async fn create_training(
    State(state): State<AppState>,
    Json(request): Json<TrainingRequest>,
) -> ApiResult<Training> {
    let training = state.lookups().create_training(&request).await?;
    Ok(ApiResponse::created(training).message("Training added"))
}

pub async fn create_internal_project(
    State(state): State<AppState>,
    Json(request): Json<InternalProjectRequest>,
) -> ApiResult<InternalProject> {
    let project = state.lookups().create_internal_project(&request).await?;
    Ok(ApiResponse::created(project).message("Internal project added"))
}

/// GET /api/manager/reports/date-range?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn date_range_report(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> ApiResult<Vec<DateRangeReportRow>> {
    Ok(ApiResponse::success(state.reports().date_range(&params).await?))
}

/// POST /api/manager/reports/job-role - body `{ "job_role_ids": [..] }`
pub async fn job_role_report(
    State(state): State<AppState>,
    Json(request): Json<JobRoleReportRequest>,
) -> ApiResult<Vec<JobRoleReportRow>> {
    Ok(ApiResponse::success(state.reports().by_job_role(&request).await?))
}
