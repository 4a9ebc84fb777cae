//! Authenticating pass-through in front of the API.
//!
//! `/`, `/health` and `/auth/*` are forwarded as-is so users can sign in;
//! `/api/*` must carry a bearer token signed with the shared secret before
//! anything is sent upstream.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    middleware::from_fn_with_state,
    response::Response,
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{jwt_auth_middleware, JwtSecret};

/// Largest request body relayed upstream.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

const FORWARDED_HEADERS: [axum::http::HeaderName; 3] = [AUTHORIZATION, CONTENT_TYPE, ACCEPT];

#[derive(Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    upstream: Url,
}

impl ProxyState {
    pub fn new(upstream: &str) -> Result<Self, url::ParseError> {
        let mut upstream = Url::parse(upstream)?;
        if !upstream.path().ends_with('/') {
            let path = format!("{}/", upstream.path());
            upstream.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            upstream,
        })
    }
}

pub fn build_proxy(state: ProxyState, secret: JwtSecret) -> Router {
    let protected = Router::new()
        .route("/api/*rest", any(forward))
        .route_layer(from_fn_with_state(secret, jwt_auth_middleware));

    Router::new()
        .route("/", any(forward))
        .route("/health", any(forward))
        .route("/auth/*rest", any(forward))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn forward(State(state): State<ProxyState>, request: Request) -> Result<Response, ApiError> {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = state
        .upstream
        .join(path_and_query.trim_start_matches('/'))
        .map_err(|e| ApiError::bad_request(format!("Invalid path: {}", e)))?;

    let method = request.method().clone();
    let mut builder = state.http.request(method.clone(), target.clone());
    for name in FORWARDED_HEADERS.iter() {
        if let Some(value) = request.headers().get(name) {
            builder = builder.header(name, value);
        }
    }

    let body = to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unreadable request body: {}", e)))?;

    let upstream = builder.body(body).send().await.map_err(|e| {
        tracing::error!("Upstream {} {} failed: {}", method, target, e);
        ApiError::bad_gateway("Upstream API is unavailable")
    })?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await.map_err(|e| {
        tracing::error!("Upstream body from {} failed: {}", target, e);
        ApiError::bad_gateway("Upstream API response was cut short")
    })?;

    tracing::debug!("{} {} -> {}", method, target, status);

    let mut response = Response::builder().status(status);
    if let Some(content_type) = content_type {
        response = response.header(CONTENT_TYPE, content_type);
    }
    response
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal_server_error(format!("Could not build response: {}", e)))
}

/// Serve the proxy on `config.proxy.port` until the process stops.
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = ProxyState::new(&config.proxy.upstream_url)?;
    let app = build_proxy(state, JwtSecret::new(&config.security.jwt_secret));

    let bind_addr = format!("0.0.0.0:{}", config.proxy.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        "Proxy listening on http://{} -> {}",
        bind_addr,
        config.proxy.upstream_url
    );

    axum::serve(listener, app).await?;
    Ok(())
}
