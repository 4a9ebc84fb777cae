use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{
    jwt_auth_middleware, require_role, AllowedRoles, ADMIN_ONLY, ALLOCATOR_ONLY, MANAGER_ONLY,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health))
        .merge(public_auth_routes())
        .nest("/api", api_routes(&state))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn public_auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/security-questions", get(auth::security_questions))
        .route("/auth/reset-password", post(auth::reset_password))
}

/// Everything under /api requires a valid token; role groups add a guard on top.
fn api_routes(state: &AppState) -> Router<AppState> {
    use protected::{auth, lookup};

    Router::new()
        .route("/auth/whoami", get(auth::whoami))
        .route("/auth/change-password", put(auth::change_password))
        .route("/jobroles", get(lookup::job_roles))
        .route("/skills", get(lookup::skills))
        .route("/allocation-types", get(lookup::allocation_types))
        .route("/trainings", get(lookup::trainings))
        .route("/internal-projects", get(lookup::internal_projects))
        .nest("/admin", guarded(admin_routes(), ADMIN_ONLY))
        .nest("/manager", guarded(manager_routes(), MANAGER_ONLY))
        .nest("/allocator", guarded(allocator_routes(), ALLOCATOR_ONLY))
        .route_layer(from_fn_with_state(state.jwt_secret(), jwt_auth_middleware))
}

fn guarded(routes: Router<AppState>, allowed: AllowedRoles) -> Router<AppState> {
    routes.route_layer(from_fn_with_state(allowed, require_role))
}

fn admin_routes() -> Router<AppState> {
    use protected::admin;

    Router::new()
        .route(
            "/employees",
            get(admin::list_employees).post(admin::create_employee),
        )
        .route(
            "/employees/:id",
            get(admin::get_employee)
                .put(admin::update_employee)
                .delete(admin::delete_employee),
        )
        .route("/jobroles", post(admin::create_job_role))
        .route("/jobroles/:id", axum::routing::delete(admin::delete_job_role))
        .route("/skills", post(admin::create_skill))
        .route("/skills/:id", axum::routing::delete(admin::delete_skill))
        .route("/users", post(admin::create_user))
}

fn manager_routes() -> Router<AppState> {
    use protected::manager;

    Router::new()
        .route("/employees", get(manager::list_employees))
        .route("/employees/:id", get(manager::get_employee))
        .route("/trainings", post(manager::create_training))
        .route("/internal-projects", post(manager::create_internal_project))
        .route("/reports/date-range", get(manager::date_range_report))
        .route("/reports/job-role", post(manager::job_role_report))
}

fn allocator_routes() -> Router<AppState> {
    use protected::allocator;

    Router::new()
        .route("/employees", get(allocator::list_bench_employees))
        .route("/employees/:id", get(allocator::get_employee))
        .route(
            "/allocations",
            get(allocator::list_allocations).post(allocator::create_allocation),
        )
        .route(
            "/allocations/:id",
            get(allocator::get_allocation)
                .put(allocator::update_allocation)
                .delete(allocator::delete_allocation),
        )
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
