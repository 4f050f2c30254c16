//! Read-only statistics endpoints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use hub_core::service_mapping::DEFAULT_TOP_SERVICES;
use hub_db::repositories::{StatsRepo, VoteRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound for the `top` query parameter of the analysis overview.
const MAX_TOP_SERVICES: usize = 50;

/// GET /api/v1/ideas/stats
pub async fn idea_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = StatsRepo::idea_stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/votes/stats
///
/// Totals, ideas ranked by votes and the full vote listing.
pub async fn vote_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = VoteRepo::report(&state.pool).await?;
    Ok(Json(DataResponse { data: report }))
}

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    /// Length of the top matched services list (default 10, max 50).
    pub top: Option<usize>,
}

/// GET /api/v1/analysis/overview
pub async fn analysis_overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> AppResult<impl IntoResponse> {
    let top = params.top.unwrap_or(DEFAULT_TOP_SERVICES);
    if !(1..=MAX_TOP_SERVICES).contains(&top) {
        return Err(AppError::BadRequest(format!(
            "top must be between 1 and {MAX_TOP_SERVICES}"
        )));
    }
    let stats = StatsRepo::analysis_stats(&state.pool, top).await?;
    Ok(Json(DataResponse { data: stats }))
}
