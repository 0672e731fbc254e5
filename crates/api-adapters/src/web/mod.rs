//! Axum adapter: router, handlers, extractors and error translation.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::Authenticated;
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::{AppState, Ports};
