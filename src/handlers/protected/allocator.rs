use axum::extract::State;

use crate::database::models::{Allocation, AllocationKind, Employee};
use crate::filter::{ListParams, Page};
use crate::middleware::{ApiResponse, ApiResult, Json, Path, Query};
use crate::services::{allocation_message, AllocationRequest};
use crate::state::AppState;

/// GET /api/allocator/employees - bench employees only
pub async fn list_bench_employees(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Employee>> {
    let mut query = params.employee_query(&state.config.api)?;
    query.allocation_type_id = Some(AllocationKind::Bench.id());
    Ok(ApiResponse::success(state.employees().list(&query).await?))
}

pub async fn get_employee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Employee> {
    Ok(ApiResponse::success(state.employees().get(id).await?))
}

/// GET /api/allocator/allocations - optionally filtered by `employee_id`
pub async fn list_allocations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Allocation>> {
    let query = params.allocation_query(&state.config.api)?;
    Ok(ApiResponse::success(state.allocations().list(&query).await?))
}

pub async fn get_allocation(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Allocation> {
    Ok(ApiResponse::success(state.allocations().get(id).await?))
}

/// POST /api/allocator/allocations - records the allocation and moves the employee to its type
pub async fn create_allocation(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> ApiResult<Allocation> {
    let allocation = state.allocations().create(&request).await?;
    let message = AllocationKind::from_id(allocation.allocation_type_id)
        .map(allocation_message)
        .unwrap_or("Allocation recorded");
    Ok(ApiResponse::created(allocation).message(message))
}

pub async fn update_allocation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AllocationRequest>,
) -> ApiResult<Allocation> {
    let allocation = state.allocations().update(id, &request).await?;
    Ok(ApiResponse::success(allocation).message("Allocation updated"))
}

pub async fn delete_allocation(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.allocations().delete(id).await?;
    Ok(ApiResponse::success(()).message("Allocation deleted"))
}
