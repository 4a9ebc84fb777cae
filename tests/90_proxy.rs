mod common;

use allocation_api::auth::Role;
use allocation_api::middleware::JwtSecret;
use allocation_api::proxy::{build_proxy, ProxyState};
use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

use common::{get, post, spawn_server, test_app, test_config, token_for};

async fn proxy_to_test_app() -> Result<Router> {
    let (app, _) = test_app();
    let upstream = spawn_server(app).await?;
    let state = ProxyState::new(&upstream)?;
    Ok(build_proxy(state, JwtSecret::new(&test_config().security.jwt_secret)))
}

#[tokio::test]
async fn api_requires_token_before_forwarding() -> Result<()> {
    let proxy = proxy_to_test_app().await?;

    let res = get(&proxy, "/api/jobroles", None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = get(&proxy, "/api/jobroles", Some("not.a.token")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn forwards_authenticated_requests() -> Result<()> {
    let proxy = proxy_to_test_app().await?;

    let res = get(&proxy, "/api/jobroles", Some(&token_for(Role::Manager))).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(4));

    // Upstream role checks still apply.
    let res = get(&proxy, "/api/admin/employees", Some(&token_for(Role::Allocator))).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn relays_query_and_body() -> Result<()> {
    let proxy = proxy_to_test_app().await?;
    let admin = token_for(Role::Admin);

    let created = post(
        &proxy,
        "/api/admin/employees",
        Some(&admin),
        json!({
            "name": "Via Proxy",
            "email": "proxy@example.com",
            "bench_start_date": "2024-04-01",
            "job_role_id": 1
        }),
    )
    .await?;
    assert_eq!(created.status, StatusCode::CREATED);

    let listed = get(&proxy, "/api/admin/employees?search=via", Some(&admin)).await?;
    assert_eq!(listed.body["data"]["total"], 1);
    Ok(())
}

#[tokio::test]
async fn public_auth_routes_pass_through() -> Result<()> {
    let proxy = proxy_to_test_app().await?;

    let res = get(&proxy, "/auth/security-questions", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(3));

    let res = get(&proxy, "/health", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() -> Result<()> {
    let port = portpicker::pick_unused_port().context("no free port")?;
    let state = ProxyState::new(&format!("http://127.0.0.1:{}", port))?;
    let proxy = build_proxy(state, JwtSecret::new(&test_config().security.jwt_secret));

    let res = get(&proxy, "/health", None).await?;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.body["code"], "BAD_GATEWAY");
    Ok(())
}
