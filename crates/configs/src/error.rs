use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingJwtSecret,

    #[error("`{0}` is not a duration; expected e.g. 90d, 12h, 30m or 45s")]
    InvalidDuration(String),

    #[error("unknown environment `{0}`; expected development, production or test")]
    InvalidEnvironment(String),

    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}
