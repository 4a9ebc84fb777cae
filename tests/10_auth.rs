mod common;

use allocation_api::auth::{validate_jwt, Role};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{get, post, put, test_app, test_config, token_for};

fn signup_body(username: &str, role: i16) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "s3cret-pass",
        "role": role,
        "security_question_id": 2,
        "security_answer": "Lisbon"
    })
}

#[tokio::test]
async fn health_and_root_respond() -> Result<()> {
    let (app, _) = test_app();

    let res = get(&app, "/health", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["database"], "ok");

    let res = get(&app, "/", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    Ok(())
}

#[tokio::test]
async fn signup_issues_token_with_numeric_role_claim() -> Result<()> {
    let (app, _) = test_app();

    let res = post(&app, "/auth/signup", None, signup_body("mia", 3)).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["role"], 3);

    let token = res.body["data"]["token"].as_str().unwrap_or_default();
    let claims = validate_jwt(token, &test_config().security.jwt_secret)?;
    assert_eq!(claims.role, Role::Allocator.as_i16());
    assert_eq!(claims.username, "mia");
    Ok(())
}

#[tokio::test]
async fn signin_checks_password() -> Result<()> {
    let (app, _) = test_app();
    post(&app, "/auth/signup", None, signup_body("lee", 3)).await?;

    let ok = post(&app, "/auth/signin", None, json!({ "username": "lee", "password": "s3cret-pass" })).await?;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(ok.body["data"]["token"].is_string());

    let bad = post(&app, "/auth/signin", None, json!({ "username": "lee", "password": "nope-nope" })).await?;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["success"], false);
    assert_eq!(bad.body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn signup_validation_reports_fields() -> Result<()> {
    let (app, _) = test_app();
    let res = post(
        &app,
        "/auth/signup",
        None,
        json!({
            "username": "",
            "email": "broken",
            "password": "short",
            "role": 3,
            "security_question_id": 1,
            "security_answer": "x"
        }),
    )
    .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let fields = &res.body["field_errors"];
    assert!(fields["username"].is_string());
    assert!(fields["email"].is_string());
    assert!(fields["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn whoami_and_change_password_use_token() -> Result<()> {
    let (app, _) = test_app();
    let res = post(&app, "/auth/signup", None, signup_body("kai", 3)).await?;
    let token = res.body["data"]["token"].as_str().unwrap_or_default().to_string();

    let me = get(&app, "/api/auth/whoami", Some(&token)).await?;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "kai");
    assert_eq!(me.body["data"]["role"], 3);

    let wrong = put(
        &app,
        "/api/auth/change-password",
        Some(&token),
        json!({ "current_password": "not-it-at-all", "new_password": "brand-new-pass" }),
    )
    .await?;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let changed = put(
        &app,
        "/api/auth/change-password",
        Some(&token),
        json!({ "current_password": "s3cret-pass", "new_password": "brand-new-pass" }),
    )
    .await?;
    assert_eq!(changed.status, StatusCode::OK);

    let signin = post(&app, "/auth/signin", None, json!({ "username": "kai", "password": "brand-new-pass" })).await?;
    assert_eq!(signin.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn reset_password_with_security_answer() -> Result<()> {
    let (app, _) = test_app();
    post(&app, "/auth/signup", None, signup_body("ida", 3)).await?;

    let questions = get(&app, "/auth/security-questions", None).await?;
    assert_eq!(questions.body["data"].as_array().map(Vec::len), Some(3));

    let wrong = post(
        &app,
        "/auth/reset-password",
        None,
        json!({ "username": "ida", "security_question_id": 2, "security_answer": "Porto", "new_password": "another-pass" }),
    )
    .await?;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let reset = post(
        &app,
        "/auth/reset-password",
        None,
        json!({ "username": "ida", "security_question_id": 2, "security_answer": "  lisbon ", "new_password": "another-pass" }),
    )
    .await?;
    assert_eq!(reset.status, StatusCode::OK);

    let signin = post(&app, "/auth/signin", None, json!({ "username": "ida", "password": "another-pass" })).await?;
    assert_eq!(signin.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn anonymous_signup_cannot_claim_admin_or_manager() -> Result<()> {
    let (app, _) = test_app();

    for role in [1, 2] {
        let res = post(&app, "/auth/signup", None, signup_body("eve", role)).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.body["field_errors"]["role"].is_string());
    }
    let signin = post(&app, "/auth/signin", None, json!({ "username": "eve", "password": "s3cret-pass" })).await?;
    assert_eq!(signin.status, StatusCode::UNAUTHORIZED);

    let mut body = signup_body("sam", 3);
    if let Some(fields) = body.as_object_mut() {
        fields.remove("role");
    }
    let res = post(&app, "/auth/signup", None, body).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["data"]["role"], 3);
    Ok(())
}

#[tokio::test]
async fn admin_creates_privileged_accounts() -> Result<()> {
    let (app, _) = test_app();

    let denied = post(&app, "/api/admin/users", Some(&token_for(Role::Manager)), signup_body("max", 2)).await?;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = post(&app, "/api/admin/users", Some(&token_for(Role::Admin)), signup_body("max", 2)).await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["role"], 2);
    assert!(created.body["data"]["token"].is_null());

    let signin = post(&app, "/auth/signin", None, json!({ "username": "max", "password": "s3cret-pass" })).await?;
    assert_eq!(signin.body["data"]["role"], 2);
    Ok(())
}
