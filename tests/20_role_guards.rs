mod common;

use allocation_api::auth::{generate_jwt, Claims, Role};
use anyhow::Result;
use axum::http::StatusCode;

use common::{get, test_app, token_for};

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let (app, _) = test_app();

    for path in [
        "/api/jobroles",
        "/api/auth/whoami",
        "/api/admin/employees",
        "/api/manager/employees",
        "/api/allocator/employees",
    ] {
        let res = get(&app, path, None).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{}", path);
        assert_eq!(res.body["success"], false);
    }
    Ok(())
}

#[tokio::test]
async fn role_groups_admit_only_their_role() -> Result<()> {
    let (app, _) = test_app();
    let cases = [
        ("/api/admin/employees", Role::Admin),
        ("/api/manager/employees", Role::Manager),
        ("/api/allocator/employees", Role::Allocator),
    ];

    for (path, allowed) in cases {
        for role in [Role::Admin, Role::Manager, Role::Allocator] {
            let res = get(&app, path, Some(&token_for(role))).await?;
            let expected = if role == allowed { StatusCode::OK } else { StatusCode::FORBIDDEN };
            assert_eq!(res.status, expected, "{} as {}", path, role);
        }
    }
    Ok(())
}

#[tokio::test]
async fn lookups_are_open_to_every_role() -> Result<()> {
    let (app, _) = test_app();
    for role in [Role::Admin, Role::Manager, Role::Allocator] {
        let res = get(&app, "/api/allocation-types", Some(&token_for(role))).await?;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["data"][1]["name"], "Training");
    }
    Ok(())
}

#[tokio::test]
async fn foreign_or_garbage_tokens_are_rejected() -> Result<()> {
    let (app, _) = test_app();

    let forged = generate_jwt(&Claims::new(1, "eve".into(), Role::Admin, 1), "someone-else")?;
    let res = get(&app, "/api/admin/employees", Some(&forged)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = get(&app, "/api/admin/employees", Some("not.a.jwt")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}
