use allocation_api::{connect_repository, routes::build_router, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("allocation_api=info,tower_http=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = allocation_api::config::config().clone();
    tracing::info!(
        "Starting allocation API v{} in {:?} mode",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let repo = connect_repository(&config).await?;
    let port = config.api.port;
    let state = AppState::new(repo, config);

    if let Some(admin) = &state.config.security.bootstrap_admin {
        if state.auth().ensure_admin(admin).await? {
            tracing::info!("Created bootstrap admin {}", admin.username);
        }
    }

    let app = build_router(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Allocation API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
