use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domains::{Application, ApplicationFilter, ApplicationInput, ApplicationListing, StatusUpdate};
use serde::Serialize;

use crate::envelope::Envelope;
use crate::web::auth::Authenticated;
use crate::web::error::ApiResult;
use crate::web::state::AppState;

#[derive(Serialize)]
struct OneApplication {
    application: Application,
}

#[derive(Serialize)]
struct ManyApplications {
    applications: Vec<ApplicationListing>,
}

/// `POST /api/applications/submit`. Public.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<ApplicationInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let application = state.applications.submit(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            Envelope::success(OneApplication { application })
                .with_message("Application submitted successfully!"),
        ),
    ))
}

/// `GET /api/applications`
pub async fn list(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let filter = ApplicationFilter::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let applications = state.applications.list(&filter).await?;
    let results = applications.len();
    Ok(Json(Envelope::success(ManyApplications { applications }).with_results(results)))
}

/// `PATCH /api/applications/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    let application = state.applications.update_status(&id, update).await?;
    Ok(Json(Envelope::success(OneApplication { application })))
}
