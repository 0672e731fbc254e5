use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use domains::{Opportunity, OpportunityInput, OpportunityQuery};
use serde::Serialize;

use crate::envelope::Envelope;
use crate::web::auth::Authenticated;
use crate::web::error::ApiResult;
use crate::web::handlers::no_content;
use crate::web::state::AppState;

/// An opportunity as clients see it: the stored record plus derived expiry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityView {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub is_expired: bool,
}

impl OpportunityView {
    pub fn at(opportunity: Opportunity, now: DateTime<Utc>) -> Self {
        let is_expired = opportunity.is_expired(now);
        Self { opportunity, is_expired }
    }
}

#[derive(Serialize)]
struct OneOpportunity {
    opportunity: OpportunityView,
}

#[derive(Serialize)]
struct ManyOpportunities {
    opportunities: Vec<OpportunityView>,
}

/// `GET /api/opportunities`
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = OpportunityQuery::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let now = Utc::now();
    let opportunities: Vec<_> = state
        .opportunities
        .list(&query)
        .await?
        .into_iter()
        .map(|o| OpportunityView::at(o, now))
        .collect();
    let results = opportunities.len();
    Ok(Json(Envelope::success(ManyOpportunities { opportunities }).with_results(results)))
}

/// `GET /api/opportunities/{id}`
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let opportunity = state.opportunities.get(&id).await?;
    Ok(Json(Envelope::success(OneOpportunity {
        opportunity: OpportunityView::at(opportunity, Utc::now()),
    })))
}

/// `POST /api/opportunities`
pub async fn create(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    payload: Result<Json<OpportunityInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let opportunity = state.opportunities.create(input).await?;
    tracing::debug!(account_id = %identity.account().id, opportunity_id = %opportunity.id, "posted by");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(OneOpportunity {
            opportunity: OpportunityView::at(opportunity, Utc::now()),
        })),
    ))
}

/// `PATCH /api/opportunities/{id}`
pub async fn update(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<OpportunityInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(patch) = payload?;
    let opportunity = state.opportunities.update(&id, patch).await?;
    Ok(Json(Envelope::success(OneOpportunity {
        opportunity: OpportunityView::at(opportunity, Utc::now()),
    })))
}

/// `DELETE /api/opportunities/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.opportunities.delete(&id).await?;
    Ok(no_content())
}
