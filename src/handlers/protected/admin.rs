use axum::extract::State;

use crate::database::models::{Employee, JobRole, Skill};
use crate::filter::{ListParams, Page};
use crate::middleware::{ApiResponse, ApiResult, Json, Path, Query};
use crate::services::{EmployeeRequest, NameRequest, SignUpRequest, UserInfo};
use crate::state::AppState;

/// GET /api/admin/employees
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Employee>> {
    let query = params.employee_query(&state.config.api)?;
    Ok(ApiResponse::success(state.employees().list(&query).await?))
}

/// GET /api/admin/employees/:id
pub async fn get_employee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Employee> {
    Ok(ApiResponse::success(state.employees().get(id).await?))
}

/// POST /api/admin/employees
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<EmployeeRequest>,
) -> ApiResult<Employee> {
    let employee = state.employees().create(&request).await?;
    Ok(ApiResponse::created(employee).message("Employee added"))
}

/// PUT /api/admin/employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EmployeeRequest>,
) -> ApiResult<Employee> {
    let employee = state.employees().update(id, &request).await?;
    Ok(ApiResponse::success(employee).message("Employee updated"))
}

/// DELETE /api/admin/employees/:id
pub async fn delete_employee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.employees().delete(id).await?;
    Ok(ApiResponse::success(()).message("Employee deleted"))
}

pub async fn create_job_role(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> ApiResult<JobRole> {
    let role = state.lookups().create_job_role(&request).await?;
    Ok(ApiResponse::created(role).message("Job role added"))
}

pub async fn delete_job_role(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.lookups().delete_job_role(id).await?;
    Ok(ApiResponse::success(()).message("Job role deleted"))
}

pub async fn create_skill(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> ApiResult<Skill> {
    let skill = state.lookups().create_skill(&request).await?;
    Ok(ApiResponse::created(skill).message("Skill added"))
}

pub async fn delete_skill(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.lookups().delete_skill(id).await?;
    Ok(ApiResponse::success(()).message("Skill deleted"))
}

/// POST /api/admin/users - create an account with any role
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> ApiResult<UserInfo> {
    let user = state.auth().register(&request).await?;
    Ok(ApiResponse::created(user).message("Account created"))
}
