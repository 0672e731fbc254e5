//! Creates the administrator account from `SEED_ADMIN_EMAIL` and
//! `SEED_ADMIN_PASSWORD`. Re-running against a seeded database is a no-op.

use std::sync::Arc;

use anyhow::{bail, Context};
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use configs::Settings;
use domains::DomainError;
use secrecy::ExposeSecret;
use services::auth::Credentials;
use services::AuthService;
use storage_adapters::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().context("invalid configuration")?;
    let Some(url) = &settings.database.url else {
        bail!("DATABASE_URL must be set to seed");
    };
    let email = std::env::var("SEED_ADMIN_EMAIL").context("SEED_ADMIN_EMAIL is not set")?;
    let password = std::env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD is not set")?;

    let store = PostgresStore::connect(
        url.expose_secret(),
        settings.database.max_connections,
        settings.database.timeout,
    )
    .await?;
    store.migrate().await?;
    let store = Arc::new(store);

    let auth = AuthService::new(
        store,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenService::new(&settings.auth.jwt_secret, settings.auth.token_ttl)),
    );

    seed_admin(&auth, email, password).await?;
    Ok(())
}

/// Signs the administrator up. Returns `false` when the account already exists.
async fn seed_admin(auth: &AuthService, email: String, password: String) -> anyhow::Result<bool> {
    match auth
        .signup(Credentials { email: Some(email.clone()), password: Some(password) })
        .await
    {
        Ok(session) => {
            info!(account_id = %session.account.id, email = %session.account.email, "admin account created");
            Ok(true)
        }
        Err(DomainError::Conflict(_)) => {
            info!(%email, "admin account already exists");
            Ok(false)
        }
        Err(e) => Err(e).context("seeding failed"),
    }
}
