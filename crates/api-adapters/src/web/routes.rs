//! API routes.

use axum::http::{header, HeaderValue};
use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::web::error::expose_error_detail;
use crate::web::handlers::{self, applications, auth, dashboard, opportunities};
use crate::web::state::AppState;

/// Builds the full router. Protected routes are the ones whose handlers take
/// an `Authenticated` argument.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/change-password", patch(auth::change_password));

    let opportunity_routes = Router::new()
        .route(
            "/api/opportunities",
            get(opportunities::list).post(opportunities::create),
        )
        .route(
            "/api/opportunities/{id}",
            get(opportunities::get)
                .patch(opportunities::update)
                .delete(opportunities::delete),
        );

    let application_routes = Router::new()
        .route("/api/applications", get(applications::list))
        .route("/api/applications/submit", post(applications::submit))
        .route("/api/applications/{id}/status", patch(applications::update_status));

    let dashboard_routes = Router::new()
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/recent-opportunities", get(dashboard::recent));

    let service_routes = Router::new()
        .route("/", get(handlers::banner))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics));

    let cors = state.config.cors.layer();

    Router::new()
        .merge(service_routes)
        .merge(auth_routes)
        .merge(opportunity_routes)
        .merge(application_routes)
        .merge(dashboard_routes)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), expose_error_detail))
        .layer(middleware::from_fn_with_state(state.clone(), handlers::track_requests))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
