//! # RightPool API binary
//!
//! Loads settings, picks the storage backend, wires adapters into the
//! services and serves the Axum router until interrupted.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{build_router, ApiConfig, AppState, CorsConfig, Ports};
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use configs::{Environment, Settings};
use secrecy::ExposeSecret;
use storage_adapters::{MemoryAccountRepository, MemoryApplicationRepository, MemoryOpportunityRepository};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();
    install_panic_hook();

    if let Err(e) = run().await {
        error!(error = format!("{:#}", e), "fatal startup error");
        std::process::exit(1);
    }
}

/// A panic anywhere, including inside a spawned task, is logged and then
/// ends the process with exit code 1.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic| {
        error!(%panic, "unhandled panic, shutting down");
        std::process::exit(1);
    }));
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("invalid configuration")?;
    info!(
        environment = settings.environment.as_str(),
        host = %settings.server.host,
        port = settings.server.port,
        "starting RightPool API"
    );

    let ports = ports(&settings).await?;
    let state = AppState::new(api_config(&settings), ports);
    let app = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

fn api_config(settings: &Settings) -> ApiConfig {
    ApiConfig {
        cors: CorsConfig {
            allowed_origins: settings.cors.origins(),
            mirror_any_origin: settings.environment == Environment::Development,
        },
        expose_error_detail: settings.environment == Environment::Development,
        service_name: "RightPool".into(),
    }
}

async fn ports(settings: &Settings) -> anyhow::Result<Ports> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(JwtTokenService::new(&settings.auth.jwt_secret, settings.auth.token_ttl));

    #[cfg(feature = "db-postgres")]
    if let Some(url) = &settings.database.url {
        let store = storage_adapters::PostgresStore::connect(
            url.expose_secret(),
            settings.database.max_connections,
            settings.database.timeout,
        )
        .await
        .context("database connection failed")?;
        store.migrate().await.context("database migration failed")?;
        let store = Arc::new(store);
        return Ok(Ports {
            accounts: store.clone(),
            opportunities: store.clone(),
            applications: store,
            hasher,
            tokens,
        });
    }

    if settings.database.url.is_some() {
        warn!("DATABASE_URL is set but this build has no database support");
    }
    warn!("no database configured, data lives in memory and is lost on exit");
    Ok(Ports {
        accounts: Arc::new(MemoryAccountRepository::new()),
        opportunities: Arc::new(MemoryOpportunityRepository::new()),
        applications: Arc::new(MemoryApplicationRepository::new()),
        hasher,
        tokens,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
