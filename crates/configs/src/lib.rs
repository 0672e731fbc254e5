//! # configs
//!
//! Process settings, loaded once at startup and passed down explicitly.
//!
//! Layering, lowest precedence first:
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/{environment}.toml` (optional)
//! 4. `RIGHTPOOL__SECTION__KEY` environment variables
//! 5. the conventional `PORT`, `DATABASE_URL`, `JWT_SECRET`,
//!    `JWT_EXPIRES_IN`, `FRONTEND_URL` and `APP_ENV` variables

mod duration;
mod error;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, File};
use secrecy::SecretString;
use serde::Deserialize;

pub use duration::parse_duration;
pub use error::ConfigError;

const ENV_PREFIX: &str = "RIGHTPOOL";

/// Origins allowed in production when none are configured.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "https://rightpool.vercel.app",
    "http://localhost:5173",
    "http://localhost:3000",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// `None` selects the in-memory store.
    pub url: Option<SecretString>,
    pub max_connections: u32,
    /// Bound on every store call and on pool acquisition.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub token_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub frontend_url: Option<String>,
}

impl CorsSettings {
    /// Configured origins plus the frontend URL, without duplicates.
    pub fn origins(&self) -> Vec<String> {
        let mut origins = self.allowed_origins.clone();
        if let Some(url) = &self.frontend_url {
            if !origins.contains(url) {
                origins.push(url.clone());
            }
        }
        origins
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub cors: CorsSettings,
}

/// Shape read from the layered sources before validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    environment: String,
    server: RawServer,
    database: RawDatabase,
    auth: RawAuth,
    cors: RawCors,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    url: Option<String>,
    max_connections: u32,
    timeout: String,
}

#[derive(Debug, Deserialize)]
struct RawAuth {
    jwt_secret: Option<String>,
    jwt_expires_in: String,
}

#[derive(Debug, Deserialize)]
struct RawCors {
    allowed_origins: Vec<String>,
    frontend_url: Option<String>,
}

impl Settings {
    /// Loads `.env` (if present), then the layered sources from the process
    /// environment and the `config/` directory.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_sources(std::env::vars().collect(), Some(Path::new("config")))
    }

    /// Builds settings from an explicit variable map and optional config
    /// directory. Without `APP_ENV` the process runs as production.
    pub fn from_sources(
        vars: HashMap<String, String>,
        config_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let env_name = vars
            .get("APP_ENV")
            .or_else(|| vars.get("RIGHTPOOL__ENVIRONMENT"))
            .map(String::as_str)
            .unwrap_or("production");
        let environment: Environment = env_name.parse()?;

        let mut builder = Config::builder()
            .set_default("environment", environment.as_str())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.timeout", "10s")?
            .set_default("auth.jwt_expires_in", "90d")?
            .set_default(
                "cors.allowed_origins",
                DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            )?;

        if let Some(dir) = config_dir {
            builder = builder
                .add_source(File::from(dir.join("default")).required(false))
                .add_source(File::from(dir.join(environment.as_str())).required(false));
        }

        let raw: RawSettings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .source(Some(vars.clone())),
            )
            .set_override("environment", environment.as_str())?
            .set_override_option("server.port", vars.get("PORT").cloned())?
            .set_override_option("database.url", vars.get("DATABASE_URL").cloned())?
            .set_override_option("auth.jwt_secret", vars.get("JWT_SECRET").cloned())?
            .set_override_option("auth.jwt_expires_in", vars.get("JWT_EXPIRES_IN").cloned())?
            .set_override_option("cors.frontend_url", vars.get("FRONTEND_URL").cloned())?
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings, ConfigError> {
        let environment: Environment = self.environment.parse()?;

        let jwt_secret = self
            .auth
            .jwt_secret
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;
        let token_ttl = parse_duration(&self.auth.jwt_expires_in)?;
        let timeout = parse_duration(&self.database.timeout)?;

        Ok(Settings {
            environment,
            server: ServerSettings { host: self.server.host, port: self.server.port },
            database: DatabaseSettings {
                url: self
                    .database
                    .url
                    .filter(|u| !u.trim().is_empty())
                    .map(SecretString::from),
                max_connections: self.database.max_connections.max(1),
                timeout,
            },
            auth: AuthSettings { jwt_secret: SecretString::from(jwt_secret), token_ttl },
            cors: CorsSettings {
                allowed_origins: self.cors.allowed_origins,
                frontend_url: self.cors.frontend_url.filter(|u| !u.trim().is_empty()),
            },
        })
    }
}
