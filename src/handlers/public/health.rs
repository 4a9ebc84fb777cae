use axum::{extract::State, http::StatusCode, response::{IntoResponse, Json}};
use serde_json::json;

use crate::state::AppState;

/// GET / - service banner and route map
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "name": "Workforce Allocation API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health (public)",
                "public_auth": "/auth/signin, /auth/signup, /auth/security-questions, /auth/reset-password (public)",
                "auth": "/api/auth/whoami, /api/auth/change-password (any role)",
                "lookups": "/api/jobroles, /api/skills, /api/allocation-types, /api/trainings, /api/internal-projects (any role)",
                "admin": "/api/admin/employees[/:id], /api/admin/jobroles[/:id], /api/admin/skills[/:id], /api/admin/users",
                "manager": "/api/manager/employees[/:id], /api/manager/trainings, /api/manager/internal-projects, /api/manager/reports/*",
                "allocator": "/api/allocator/employees[/:id], /api/allocator/allocations[/:id]",
            }
        },
        "message": ""
    }))
}

/// GET /health - store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repo.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" },
                "message": ""
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "data": { "status": "degraded", "timestamp": now, "database": "unavailable" },
                    "message": "database unavailable"
                })),
            )
        }
    }
}
