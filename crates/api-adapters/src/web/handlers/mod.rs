pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod opportunities;

use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use domains::DomainError;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::metrics::UNMATCHED_ROUTE;
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Serialize)]
struct Banner {
    status: &'static str,
    message: String,
    version: &'static str,
    endpoints: Endpoints,
    timestamp: String,
}

#[derive(Serialize)]
struct Endpoints {
    health: &'static str,
    auth: &'static str,
    opportunities: &'static str,
    applications: &'static str,
    dashboard: &'static str,
}

pub async fn banner(State(state): State<AppState>) -> impl IntoResponse {
    Json(Banner {
        status: "success",
        message: format!("{} API is running!", state.config.service_name),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: "/health",
            auth: "/api/auth",
            opportunities: "/api/opportunities",
            applications: "/api/applications",
            dashboard: "/api/dashboard",
        },
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    timestamp: String,
    service: String,
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        service: state.config.service_name.clone(),
    })
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<Response> {
    let text = state
        .metrics
        .render()
        .map_err(|e| DomainError::internal(format!("metrics encoding failed: {}", e)))?;
    Ok((
        [(header::CONTENT_TYPE, "application/openmetrics-text; version=1.0.0; charset=utf-8")],
        text,
    )
        .into_response())
}

pub async fn not_found(uri: Uri) -> ApiError {
    let target = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    ApiError(DomainError::not_found(format!("Can't find {} on this server!", target)))
}

/// Counts every response by method, route template and status.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
    let response = next.run(request).await;
    state.metrics.record(&method, &route, response.status().as_u16());
    response
}

/// `204 No Content`.
pub(crate) fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `{"status":"success","message":...}`
pub(crate) fn message(text: &str) -> Json<Envelope> {
    Json(Envelope::ok().with_message(text))
}
