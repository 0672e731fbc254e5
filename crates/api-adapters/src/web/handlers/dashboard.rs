use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use domains::{DashboardStats, RecentOpportunity, StatCard};
use serde::Serialize;

use crate::envelope::Envelope;
use crate::web::auth::Authenticated;
use crate::web::error::ApiResult;
use crate::web::state::AppState;

#[derive(Serialize)]
struct StatsData {
    stats: DashboardStats,
    cards: Vec<StatCard>,
}

#[derive(Serialize)]
struct RecentData {
    opportunities: Vec<RecentOpportunity>,
}

/// `GET /api/dashboard/stats`
pub async fn stats(State(state): State<AppState>, Authenticated(_): Authenticated) -> ApiResult<impl IntoResponse> {
    let stats = state.dashboard.stats(Utc::now()).await?;
    let cards = stats.cards();
    Ok(Json(Envelope::success(StatsData { stats, cards })))
}

/// `GET /api/dashboard/recent-opportunities?limit=N`. An unparsable limit
/// falls back to the default rather than failing.
pub async fn recent(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let limit = params.get("limit").and_then(|l| l.trim().parse::<i64>().ok());
    let opportunities = state.dashboard.recent(limit, Utc::now()).await?;
    let results = opportunities.len();
    Ok(Json(Envelope::success(RecentData { opportunities }).with_results(results)))
}
