use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Browser origins allowed to call the API with credentials.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    /// Reflect any request origin back. Development only.
    pub mirror_any_origin: bool,
}

impl CorsConfig {
    pub fn layer(&self) -> CorsLayer {
        let origin = if self.mirror_any_origin {
            AllowOrigin::mirror_request()
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::PUT,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub cors: CorsConfig,
    /// Attach the full error chain to error envelopes and show server-side
    /// messages verbatim.
    pub expose_error_detail: bool,
    /// Reported by `GET /`.
    pub service_name: String,
}
