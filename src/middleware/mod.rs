pub mod auth;
pub mod extract;
pub mod response;
pub mod role;

pub use auth::{jwt_auth_middleware, AuthUser, JwtSecret};
pub use extract::{Json, Path, Query};
pub use response::{ApiResponse, ApiResult};
pub use role::{require_role, AllowedRoles, ADMIN_ONLY, ALLOCATOR_ONLY, MANAGER_ONLY};
