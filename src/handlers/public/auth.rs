use axum::extract::State;

use crate::database::models::SecurityQuestion;
use crate::middleware::{ApiResponse, ApiResult, Json};
use crate::services::{AuthResponse, ResetPasswordRequest, SignInRequest, SignUpRequest};
use crate::state::AppState;

/// POST /auth/signin - exchange credentials for a JWT
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<AuthResponse> {
    let issued = state.auth().sign_in(&request).await?;
    Ok(ApiResponse::success(issued).message("Signed in"))
}

/// POST /auth/signup - register a user and sign them in
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> ApiResult<AuthResponse> {
    let issued = state.auth().sign_up(&request).await?;
    Ok(ApiResponse::created(issued).message("Account created"))
}

/// GET /auth/security-questions
pub async fn security_questions(State(state): State<AppState>) -> ApiResult<Vec<SecurityQuestion>> {
    Ok(ApiResponse::success(state.lookups().security_questions().await?))
}

/// POST /auth/reset-password - reset via security answer
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    state.auth().reset_password(&request).await?;
    Ok(ApiResponse::success(()).message("Password has been reset"))
}
