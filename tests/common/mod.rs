#![allow(dead_code)]

use std::sync::Arc;

use allocation_api::auth::{generate_jwt, Claims, Role};
use allocation_api::config::AppConfig;
use allocation_api::database::MemoryRepository;
use allocation_api::routes::build_router;
use allocation_api::state::AppState;
use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub fn test_config() -> AppConfig {
    AppConfig::development()
}

/// Router over a fresh seeded in-memory store.
pub fn test_app() -> (Router, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::seeded());
    let state = AppState::new(repo.clone(), test_config());
    (build_router(state), repo)
}

pub fn token_for(role: Role) -> String {
    let config = test_config();
    let claims = Claims::new(1, format!("{}-user", role.name()), role, 1);
    generate_jwt(&claims, &config.security.jwt_secret).expect("token")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await.context("router call")?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| {
            format!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
        })?
    };

    Ok(TestResponse { status, body })
}

/// POST a raw body as `application/json`, for payloads that are not valid JSON.
pub async fn post_raw(app: &Router, uri: &str, token: Option<&str>, body: &str) -> Result<TestResponse> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;

    let response = app.clone().oneshot(request).await.context("router call")?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = serde_json::from_slice(&bytes)
        .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?;
    Ok(TestResponse { status, body })
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Result<TestResponse> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Result<TestResponse> {
    send(app, Method::DELETE, uri, token, None).await
}

/// Serve `router` on a free local port and return its base URL.
pub async fn spawn_server(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}
