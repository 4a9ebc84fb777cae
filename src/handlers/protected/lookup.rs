use axum::extract::State;

use crate::database::models::{AllocationType, InternalProject, JobRole, Skill, Training};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn job_roles(State(state): State<AppState>) -> ApiResult<Vec<JobRole>> {
    Ok(ApiResponse::success(state.lookups().job_roles().await?))
}

pub async fn skills(State(state): State<AppState>) -> ApiResult<Vec<Skill>> {
    Ok(ApiResponse::success(state.lookups().skills().await?))
}

pub async fn allocation_types(State(state): State<AppState>) -> ApiResult<Vec<AllocationType>> {
    Ok(ApiResponse::success(state.lookups().allocation_types().await?))
}

pub async fn trainings(State(state): State<AppState>) -> ApiResult<Vec<Training>> {
    Ok(ApiResponse::success(state.lookups().trainings().await?))
}

pub async fn internal_projects(State(state): State<AppState>) -> ApiResult<Vec<InternalProject>> {
    Ok(ApiResponse::success(state.lookups().internal_projects().await?))
}
