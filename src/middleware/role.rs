use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::auth::Role;
use crate::error::ApiError;

/// Roles allowed through a route group.
#[derive(Clone, Copy, Debug)]
pub struct AllowedRoles(pub &'static [Role]);

pub const ADMIN_ONLY: AllowedRoles = AllowedRoles(&[Role::Admin]);
pub const MANAGER_ONLY: AllowedRoles = AllowedRoles(&[Role::Manager]);
pub const ALLOCATOR_ONLY: AllowedRoles = AllowedRoles(&[Role::Allocator]);

/// Server-side route guard. Runs after `jwt_auth_middleware`.
pub async fn require_role(
    State(allowed): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !allowed.0.contains(&auth_user.role) {
        tracing::warn!(
            "Role guard rejected '{}' ({}) for {}",
            auth_user.username,
            auth_user.role,
            request.uri().path()
        );
        return Err(ApiError::forbidden(format!(
            "Role '{}' may not access this resource",
            auth_user.role
        )));
    }

    Ok(next.run(request).await)
}
