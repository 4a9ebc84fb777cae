mod common;

use std::sync::Arc;

use allocation_api::auth::Role;
use allocation_api::client::{
    AdminApi, AllocatorApi, ApiClient, AuthService, ClientError, GuardOutcome, JobRoleReportForm,
    ManageAllocation, ManagerApi, MemoryTokenStore, TokenStore, ADMIN_GUARD, ALLOCATOR_GUARD,
    HOME_ROUTE,
};
use allocation_api::database::models::AllocationKind;
use allocation_api::database::MemoryRepository;
use allocation_api::services::{AuthService as AccountService, EmployeeRequest, SignUpRequest};
use anyhow::Result;
use chrono::NaiveDate;

use common::{spawn_server, test_app, test_config};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn signup(username: &str, role: Role) -> SignUpRequest {
    SignUpRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "correct-horse".to_string(),
        role,
        security_question_id: 1,
        security_answer: "Rex".to_string(),
    }
}

struct Connected {
    api: ApiClient,
    tokens: Arc<MemoryTokenStore>,
    repo: Arc<MemoryRepository>,
}

async fn connected_client() -> Result<Connected> {
    let (app, repo) = test_app();
    let base = spawn_server(app).await?;
    let tokens = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(&base, tokens.clone())?;
    Ok(Connected { api, tokens, repo })
}

/// Admin and manager accounts cannot self-register; create them server side.
async fn create_account(repo: &Arc<MemoryRepository>, username: &str, role: Role) -> Result<()> {
    AccountService::new(repo.clone(), test_config().security)
        .register(&signup(username, role))
        .await?;
    Ok(())
}

#[tokio::test]
async fn session_tracks_token_store() -> Result<()> {
    let Connected { api, tokens, repo } = connected_client().await?;
    let auth = AuthService::new(api);
    assert!(!auth.is_authenticated());
    assert_eq!(ADMIN_GUARD.can_activate(tokens.as_ref()), GuardOutcome::Redirect(HOME_ROUTE));

    create_account(&repo, "ada", Role::Admin).await?;
    auth.sign_in("ada", "correct-horse").await?;
    assert!(auth.is_authenticated());
    assert_eq!(auth.username().as_deref(), Some("ada"));
    assert_eq!(auth.role(), Some(Role::Admin));
    assert_eq!(ADMIN_GUARD.can_activate(tokens.as_ref()), GuardOutcome::Allow);
    assert!(!ALLOCATOR_GUARD.can_activate(tokens.as_ref()).is_allowed());

    let me = auth.whoami().await?;
    assert_eq!(me.username, "ada");

    auth.sign_out()?;
    assert!(tokens.token().is_none());
    assert!(matches!(auth.whoami().await, Err(ClientError::NotAuthenticated)));
    Ok(())
}

#[tokio::test]
async fn wrong_password_surfaces_api_error() -> Result<()> {
    let Connected { api, repo, .. } = connected_client().await?;
    let auth = AuthService::new(api);
    create_account(&repo, "bob", Role::Manager).await?;

    let err = auth.sign_in("bob", "nope-nope-nope").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!auth.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn self_sign_up_as_admin_is_refused() -> Result<()> {
    let Connected { api, .. } = connected_client().await?;
    let auth = AuthService::new(api);

    let err = auth.sign_up(&signup("mal", Role::Admin)).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!auth.is_authenticated());

    auth.sign_up(&signup("ally", Role::Allocator)).await?;
    assert_eq!(auth.role(), Some(Role::Allocator));
    Ok(())
}

#[tokio::test]
async fn allocation_screen_end_to_end() -> Result<()> {
    let Connected { api, repo, .. } = connected_client().await?;
    let auth = AuthService::new(api.clone());

    create_account(&repo, "ada", Role::Admin).await?;
    auth.sign_in("ada", "correct-horse").await?;
    let admin = AdminApi::new(api.clone());
    let alf = admin.add_user(&signup("alf", Role::Allocator)).await?;
    assert_eq!(alf.role, Role::Allocator);
    let employee = admin
        .add_employee(&EmployeeRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            bench_start_date: date(2024, 1, 2),
            bench_end_date: None,
            job_role_id: 1,
            skill_ids: vec![1, 2],
            allocation_type_id: AllocationKind::Bench.id(),
        })
        .await?
        .data;

    auth.sign_out()?;
    auth.sign_in("alf", "correct-horse").await?;
    let allocator = AllocatorApi::new(api.clone());

    let mut screen = ManageAllocation::load(&allocator, employee.id, date(2024, 6, 1)).await?;
    assert_eq!(screen.employee.name, "Grace");
    screen.form.type_id = AllocationKind::Training.id();
    screen.form.end_date = date(2024, 6, 30);
    assert_eq!(screen.submit().await?, "Employee allocated to training successfully");

    let updated = allocator.get_employee(employee.id).await?;
    assert_eq!(updated.allocation_type_id, AllocationKind::Training.id());

    let missing = ManageAllocation::load(&allocator, 999, date(2024, 6, 1)).await;
    assert_eq!(missing.err().and_then(|e| e.status()), Some(404));
    Ok(())
}

#[tokio::test]
async fn job_role_report_form_against_server() -> Result<()> {
    let Connected { api, repo, .. } = connected_client().await?;
    let auth = AuthService::new(api.clone());
    create_account(&repo, "meg", Role::Manager).await?;
    auth.sign_in("meg", "correct-horse").await?;
    let manager = ManagerApi::new(api);

    let mut empty = JobRoleReportForm::new(vec![]);
    assert!(empty.submit(&manager).await.is_err());
    assert_eq!(empty.error.as_deref(), Some("Please select at least one job role"));

    let mut form = JobRoleReportForm::new(vec![1, 2]);
    form.submit(&manager).await?;
    assert!(form.error.is_none());
    assert!(form.rows.is_empty());
    Ok(())
}
