use axum::{extract::State, Extension};

use crate::middleware::{ApiResponse, ApiResult, AuthUser, Json};
use crate::services::{ChangePasswordRequest, UserInfo};
use crate::state::AppState;

/// GET /api/auth/whoami
pub async fn whoami(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<UserInfo> {
    Ok(ApiResponse::success(state.auth().whoami(&user)))
}

/// PUT /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    state.auth().change_password(&user, &request).await?;
    Ok(ApiResponse::success(()).message("Password changed"))
}
