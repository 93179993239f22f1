use axum::{routing::get_service, Router};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::{net::SocketAddr, path::Path};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bloodbank::api::middleware::session::{create_session_layer, AppState};
use bloodbank::config::Config;
use bloodbank::db;
use bloodbank::models::user::User;
use bloodbank::services::password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bloodbank=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting blood bank server...");

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let pool = db::create_pool(config.database_url.expose_secret()).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    ensure_admin_account(&pool, &config).await?;

    let session_layer = create_session_layer(pool.clone(), &config).await?;
    tracing::info!("Session layer initialized");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    // Serve static assets from web/static
    let static_routes = Router::new().nest_service(
        "/static",
        get_service(ServeDir::new(Path::new("web").join("static"))),
    );

    let app = bloodbank::api::router()
        .merge(static_routes)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Creates the configured staff account on first start
async fn ensure_admin_account(pool: &PgPool, config: &Config) -> anyhow::Result<()> {
    let (Some(username), Some(admin_password)) = (&config.admin_username, &config.admin_password)
    else {
        return Ok(());
    };

    let hash = password::hash_password(admin_password.expose_secret())?;
    if User::create_if_missing(pool, username, &hash).await? {
        tracing::info!(username = %username, "Created staff account");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, cleaning up...");
}
